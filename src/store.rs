//! The authoritative in-memory event list.
//!
//! Holds the live list, a linear undo/redo history of full-list
//! snapshots, single- and multi-selection, an optional edit session with
//! restore-on-cancel, and the remote merge. Mutations are synchronous;
//! the async boundary stays in [`crate::sync`] and [`crate::remote`].

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::event::Event;

/// Snapshot of an event's user-editable fields, captured when its detail
/// view opens. Used to decide whether closing without saving must revert.
#[derive(Debug, Clone, PartialEq)]
struct EditSnapshot {
    event: Event,
    /// True when the edit session opened on a just-created event that has
    /// never been saved; cancelling removes it instead of reverting.
    is_new: bool,
}

#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
    history: Vec<Vec<Event>>,
    cursor: usize,
    selected: Option<String>,
    multi_selected: HashSet<String>,
    edit: Option<EditSnapshot>,
}

impl EventStore {
    pub fn new() -> Self {
        EventStore {
            events: Vec::new(),
            history: vec![Vec::new()],
            cursor: 0,
            selected: None,
            multi_selected: HashSet::new(),
            edit: None,
        }
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        EventStore {
            history: vec![events.clone()],
            events,
            cursor: 0,
            selected: None,
            multi_selected: HashSet::new(),
            edit: None,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    /// Replace the live list and push a history snapshot. Any redo tail
    /// beyond the cursor is discarded.
    pub fn commit(&mut self, events: Vec<Event>) {
        self.events = events;
        self.push_snapshot();
    }

    fn push_snapshot(&mut self) {
        self.history.truncate(self.cursor + 1);
        self.history.push(self.events.clone());
        self.cursor = self.history.len() - 1;
    }

    /// Add one event and push history.
    pub fn insert(&mut self, event: Event) {
        self.events.push(event);
        self.push_snapshot();
    }

    /// Remove one event and push history. Returns the removed row so the
    /// caller can drive the remote delete from it.
    pub fn remove(&mut self, id: &str) -> GridResult<Event> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| GridError::EventNotFound(id.to_string()))?;
        let removed = self.events.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.multi_selected.remove(id);
        self.push_snapshot();
        Ok(removed)
    }

    /// Mid-gesture move preview. Updates the list without touching history.
    pub fn apply_temporary_move(&mut self, id: &str, start: NaiveDateTime, end: NaiveDateTime) {
        if let Some(event) = self.get_mut(id) {
            event.start = start;
            event.end = end;
            event.is_being_moved = true;
        }
    }

    /// Mid-gesture resize preview. Updates the list without touching history.
    pub fn apply_temporary_resize(&mut self, id: &str, start: NaiveDateTime, end: NaiveDateTime) {
        if let Some(event) = self.get_mut(id) {
            event.start = start;
            event.end = end;
            event.is_being_resized = true;
        }
    }

    /// Finalize a gesture's times: clear the transient flags and push a
    /// history snapshot.
    pub fn commit_times(&mut self, id: &str, start: NaiveDateTime, end: NaiveDateTime) -> GridResult<()> {
        let event = self
            .get_mut(id)
            .ok_or_else(|| GridError::EventNotFound(id.to_string()))?;
        event.start = start;
        event.end = end;
        event.clear_drag_flags();
        self.push_snapshot();
        Ok(())
    }

    /// Put an event's times back without recording history. Used by the
    /// recurrence cancel path.
    pub fn revert_times(&mut self, id: &str, start: NaiveDateTime, end: NaiveDateTime) {
        if let Some(event) = self.get_mut(id) {
            event.start = start;
            event.end = end;
            event.clear_drag_flags();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.events = self.history[self.cursor].clone();
        self.prune_selection();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        self.events = self.history[self.cursor].clone();
        self.prune_selection();
        true
    }

    /// Drop any selection pointing at an id absent from the current list.
    fn prune_selection(&mut self) {
        if let Some(id) = &self.selected {
            if !self.contains(id) {
                self.selected = None;
            }
        }
        let events = &self.events;
        self.multi_selected.retain(|id| events.iter().any(|e| &e.id == id));
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Plain click selection. Clears the multi-select set.
    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
        self.multi_selected.clear();
    }

    /// Modifier-click selection. Toggles membership in the multi-select
    /// set without disturbing the single selection.
    pub fn toggle_multi_select(&mut self, id: &str) {
        if !self.multi_selected.remove(id) {
            self.multi_selected.insert(id.to_string());
        }
    }

    pub fn multi_selected(&self) -> &HashSet<String> {
        &self.multi_selected
    }

    /// Open an event's detail view: capture the pre-open field values so
    /// closing without a save can revert them.
    pub fn open_for_edit(&mut self, id: &str) -> GridResult<()> {
        let event = self
            .get(id)
            .ok_or_else(|| GridError::EventNotFound(id.to_string()))?
            .clone();
        let is_new = event.has_temp_id();
        self.edit = Some(EditSnapshot { event, is_new });
        Ok(())
    }

    /// Close the detail view. With `saved`, the current values stand and a
    /// history snapshot is pushed. Without it, changed fields revert to
    /// the pre-open values; a never-saved new event is removed outright.
    /// Returns the id of any event removed this way.
    pub fn close_edit(&mut self, saved: bool) -> Option<String> {
        let snapshot = self.edit.take()?;
        let id = snapshot.event.id.clone();

        if saved {
            if self.contains(&id) {
                self.push_snapshot();
            }
            return None;
        }

        if snapshot.is_new {
            self.events.retain(|e| e.id != id);
            if self.selected.as_deref() == Some(id.as_str()) {
                self.selected = None;
            }
            debug!(event_id = %id, "discarded unsaved new event");
            return Some(id);
        }

        if let Some(current) = self.get_mut(&id) {
            if edited_fields_differ(current, &snapshot.event) {
                current.start = snapshot.event.start;
                current.end = snapshot.event.end;
                current.title = snapshot.event.title.clone();
                current.notes = snapshot.event.notes.clone();
                current.location = snapshot.event.location.clone();
                current.color = snapshot.event.color.clone();
            }
        }
        None
    }

    /// Union polled remote rows with local-only rows. Remote rows always
    /// win on id collision and are marked as confirmed persisted. Local
    /// rows that never reached the remote are kept as-is. No history push:
    /// background reconciliation is not an undo step.
    pub fn merge_remote(&mut self, remote: Vec<Event>) {
        let remote_ids: HashSet<String> = remote.iter().map(|e| e.id.clone()).collect();
        let mut merged: Vec<Event> = remote
            .into_iter()
            .map(|mut e| {
                e.from_database = true;
                e.is_validated.get_or_insert(true);
                e
            })
            .collect();
        merged.extend(
            self.events
                .iter()
                .filter(|e| !e.from_database && !remote_ids.contains(&e.id))
                .cloned(),
        );
        self.events = merged;
        self.prune_selection();
    }

    /// A created row's remote id arrived: adopt it and mark the row
    /// confirmed persisted. Returns the old id so callers can re-key any
    /// bookkeeping of their own.
    pub fn adopt_remote_id(&mut self, temp_id: &str, durable_id: &str) -> GridResult<String> {
        let event = self
            .get_mut(temp_id)
            .ok_or_else(|| GridError::EventNotFound(temp_id.to_string()))?;
        let old = std::mem::replace(&mut event.id, durable_id.to_string());
        event.from_database = true;
        event.is_validated = Some(true);
        // Known categories get their fill and validated-accent colors.
        if let Some(category) = crate::constants::category_for(&event.color) {
            event.color1 = Some(category.color1.to_string());
            event.color2 = Some(category.color2.to_string());
        }
        if self.selected.as_deref() == Some(old.as_str()) {
            self.selected = Some(durable_id.to_string());
        }
        Ok(old)
    }

    /// All members of the given event's series, including the event itself.
    pub fn series_members(&self, event: &Event) -> Vec<&Event> {
        self.events.iter().filter(|e| e.in_series_with(event)).collect()
    }

    /// Shift a set of series members by one delta and re-key them under a
    /// new recurrence id, as a single history step.
    pub fn apply_series_shift(&mut self, ids: &[String], delta: Duration, new_recurrence_id: &str) {
        for event in self.events.iter_mut().filter(|e| ids.contains(&e.id)) {
            event.start += delta;
            event.end += delta;
            event.is_recurring = true;
            event.recurrence_id = Some(new_recurrence_id.to_string());
            event.clear_drag_flags();
        }
        self.push_snapshot();
    }

    /// Apply new times to one occurrence and strip its series membership,
    /// making it a standalone exception.
    pub fn detach_occurrence(&mut self, id: &str, start: NaiveDateTime, end: NaiveDateTime) -> GridResult<()> {
        let event = self
            .get_mut(id)
            .ok_or_else(|| GridError::EventNotFound(id.to_string()))?;
        event.start = start;
        event.end = end;
        event.recurrence_id = None;
        event.is_recurring = false;
        event.clear_drag_flags();
        self.push_snapshot();
        Ok(())
    }

    /// Remove several events as a single history step.
    pub fn remove_many(&mut self, ids: &[String]) -> Vec<Event> {
        let mut removed = Vec::new();
        self.events.retain(|e| {
            if ids.contains(&e.id) {
                removed.push(e.clone());
                false
            } else {
                true
            }
        });
        self.prune_selection();
        self.push_snapshot();
        removed
    }
}

fn edited_fields_differ(a: &Event, b: &Event) -> bool {
    a.start != b.start
        || a.end != b.end
        || a.title != b.title
        || a.notes != b.notes
        || a.location != b.location
        || a.color != b.color
}
