//! Event types for the scheduling grid.
//!
//! `Event` is the central entity: a time-boxed block on the grid with
//! category colors, persistence flags, and optional series membership.
//! `DraftEvent` is the gesture-in-progress shape used by drag-to-create;
//! it is promoted to a real `Event` with a transient id on completion.

use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EVENT_COLOR, DRAFT_ID_PREFIX, TEMP_ID_PREFIX};

/// A scheduled event on the time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,

    /// Category accent color; doubles as the category discriminator.
    pub color: String,
    /// Category fill color.
    #[serde(default)]
    pub color1: Option<String>,
    /// Validated accent color.
    #[serde(default)]
    pub color2: Option<String>,

    /// Tri-state: `Some(true)` once confirmed persisted, `Some(false)`
    /// explicitly unvalidated, `None` unknown.
    #[serde(default)]
    pub is_validated: Option<bool>,
    /// True once the event is known to exist in the remote store.
    #[serde(default)]
    pub from_database: bool,

    // Recurrence
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_id: Option<String>,

    // Transient render flags, set only during an in-progress drag.
    #[serde(skip)]
    pub is_being_moved: bool,
    #[serde(skip)]
    pub is_being_resized: bool,

    // Assignment metadata for the resource/team rendering mode; inert
    // as far as the grid algorithms are concerned.
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub worker_type: Option<String>,
    #[serde(default)]
    pub employees: Option<String>,
}

impl Event {
    /// A bare event with the default draft color; mainly for call sites
    /// that fill in fields afterwards (and for tests).
    pub fn new(id: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Event {
            id: id.into(),
            title: String::new(),
            notes: String::new(),
            location: String::new(),
            start,
            end,
            color: DEFAULT_EVENT_COLOR.to_string(),
            color1: None,
            color2: None,
            is_validated: None,
            from_database: false,
            is_recurring: false,
            recurrence_id: None,
            is_being_moved: false,
            is_being_resized: false,
            worker_id: None,
            employee_id: None,
            worker_type: None,
            employees: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// A transient id means the remote store has not assigned a durable
    /// one yet; this prefix is the sole signal of "not yet persisted".
    pub fn has_temp_id(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }

    /// Base token of the id: everything before the first `-` or `_`.
    /// Series members generated from one master share this token.
    pub fn base_id(&self) -> &str {
        base_id(&self.id)
    }

    /// Whether this event belongs to the same series as `other`, either
    /// through a shared `recurrence_id` or a shared base-id token.
    pub fn in_series_with(&self, other: &Event) -> bool {
        if let (Some(a), Some(b)) = (&self.recurrence_id, &other.recurrence_id) {
            if a == b {
                return true;
            }
        }
        other.base_id() == self.base_id()
    }

    /// Clear the transient drag flags.
    pub fn clear_drag_flags(&mut self) {
        self.is_being_moved = false;
        self.is_being_resized = false;
    }
}

/// Base token of an event id: everything before the first `-` or `_`.
pub fn base_id(id: &str) -> &str {
    id.split(['-', '_']).next().unwrap_or(id)
}

/// Generate a transient event id from the current wall clock.
pub fn temp_id() -> String {
    format!("{}{}", TEMP_ID_PREFIX, Utc::now().timestamp_millis())
}

/// An event-shaped value representing a drag-to-create in progress.
/// Never enters the store's persisted list; promoted on completion.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: String,
    pub is_draft: bool,
}

impl DraftEvent {
    /// The "new event" action outside the grid: a 09:00-10:00 draft on
    /// the given date.
    pub fn for_date(date: chrono::NaiveDate) -> Self {
        let start = date.and_hms_opt(9, 0, 0).unwrap_or_default();
        DraftEvent::new(start, start + Duration::hours(1))
    }

    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        DraftEvent {
            id: format!("{}{}", DRAFT_ID_PREFIX, Utc::now().timestamp_millis()),
            title: String::new(),
            start,
            end,
            color: DEFAULT_EVENT_COLOR.to_string(),
            is_draft: true,
        }
    }

    /// Promote the draft to a real event carrying a transient id.
    pub fn promote(self) -> Event {
        self.promote_with_id(temp_id())
    }

    pub fn promote_with_id(self, id: String) -> Event {
        let mut event = Event::new(id, self.start, self.end);
        event.title = self.title;
        event.color = self.color;
        event
    }
}
