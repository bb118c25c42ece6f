//! Disambiguation protocol for edits touching a recurring series.
//!
//! A finalized move or resize on a series member is never applied
//! silently: the caller gets a [`PendingModification`] and must present
//! a three-way choice (plus cancel). The resolver applies the chosen
//! policy to the store and reports which rows turned dirty or were
//! removed. Deleting a series member follows the same protocol.
//!
//! Bulk moves (`Future`/`All`) re-key the shifted subset under a fresh
//! recurrence id: once its timing diverges from the original cadence,
//! folding it back into the old series identity would corrupt a
//! recurrence rule the backend cannot re-derive.

use tracing::debug;
use uuid::Uuid;

use crate::error::{GridError, GridResult};
use crate::event::Event;
use crate::remote::DeleteScope;
use crate::store::EventStore;
use crate::sync::SyncQueue;

use chrono::NaiveDateTime;

/// Which gesture produced the pending edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationKind {
    Move,
    Resize,
    Delete,
}

/// The caller's answer to the disambiguation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationChoice {
    /// Revert to the pre-gesture timing. Dismissing the prompt without
    /// choosing must behave like this.
    Cancel,
    /// Only the touched occurrence, detached from its series.
    Single,
    /// The touched occurrence and every member starting at or after it.
    Future,
    /// Every member of the series, regardless of date.
    All,
}

/// A series edit awaiting the caller's choice. Times are the pre-gesture
/// originals and the gesture's target; the store still holds the target
/// as a temporary preview until resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingModification {
    pub event_id: String,
    pub kind: ModificationKind,
    pub original_start: NaiveDateTime,
    pub original_end: NaiveDateTime,
    pub new_start: NaiveDateTime,
    pub new_end: NaiveDateTime,
    /// True when no other series member ends later than the touched
    /// occurrence; lets a caller collapse Future and All in its prompt.
    pub is_last_occurrence: bool,
}

/// What a gesture commit turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitDisposition {
    /// Applied directly and marked dirty.
    Applied,
    /// Series member: the caller must prompt and call [`resolve`].
    NeedsConfirmation(PendingModification),
}

/// The store-side effect of a resolved modification.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Cancelled,
    /// Rows updated locally and marked for the next flush.
    Updated { dirty_ids: Vec<String> },
    /// Rows removed locally; the caller drives the remote delete with
    /// the returned scope.
    Deleted {
        removed_ids: Vec<String>,
        scope: DeleteScope,
        recurrence_id: Option<String>,
    },
}

/// Does an edit to this event require disambiguation? Series membership
/// is signalled by the recurring flag, a recurrence id, or an id carrying
/// a series separator (transient client ids excepted).
pub fn needs_confirmation(event: &Event) -> bool {
    if event.is_recurring || event.recurrence_id.is_some() {
        return true;
    }
    !event.has_temp_id()
        && !event.id.starts_with(crate::constants::DRAFT_ID_PREFIX)
        && !event.id.starts_with(crate::constants::DUPLICATE_ID_PREFIX)
        && event.id.contains(['-', '_'])
}

/// Route a finalized move/resize: apply directly for a standalone event,
/// or hand back a pending modification for a series member. The preview
/// times stay visible in the store while the prompt is up.
pub fn apply_commit(
    store: &mut EventStore,
    queue: &mut SyncQueue,
    kind: ModificationKind,
    event_id: &str,
    new_start: NaiveDateTime,
    new_end: NaiveDateTime,
    original_start: NaiveDateTime,
    original_end: NaiveDateTime,
) -> GridResult<CommitDisposition> {
    let event = store
        .get(event_id)
        .ok_or_else(|| GridError::EventNotFound(event_id.to_string()))?;

    if !needs_confirmation(event) {
        store.commit_times(event_id, new_start, new_end)?;
        queue.mark_dirty(event_id);
        return Ok(CommitDisposition::Applied);
    }

    // Latest end wins: a member is last when no other member ends later.
    let is_last = store
        .series_members(event)
        .iter()
        .filter(|m| m.id != event_id)
        .all(|m| m.end <= original_end);

    Ok(CommitDisposition::NeedsConfirmation(PendingModification {
        event_id: event_id.to_string(),
        kind,
        original_start,
        original_end,
        new_start,
        new_end,
        is_last_occurrence: is_last,
    }))
}

/// Begin deleting an event. Standalone events are removed immediately;
/// series members require the same three-way prompt as move/resize.
pub fn request_delete(store: &mut EventStore, queue: &mut SyncQueue, event_id: &str) -> GridResult<CommitDisposition> {
    let event = store
        .get(event_id)
        .ok_or_else(|| GridError::EventNotFound(event_id.to_string()))?;

    if !needs_confirmation(event) {
        let removed = store.remove(event_id)?;
        queue.remove(event_id);
        debug!(event_id = %removed.id, "removed standalone event");
        return Ok(CommitDisposition::Applied);
    }

    let (start, end) = (event.start, event.end);
    let is_last = store
        .series_members(event)
        .iter()
        .filter(|m| m.id != event_id)
        .all(|m| m.end <= end);

    Ok(CommitDisposition::NeedsConfirmation(PendingModification {
        event_id: event_id.to_string(),
        kind: ModificationKind::Delete,
        original_start: start,
        original_end: end,
        new_start: start,
        new_end: end,
        is_last_occurrence: is_last,
    }))
}

/// Apply the caller's choice to the store.
pub fn resolve(
    pending: &PendingModification,
    choice: ModificationChoice,
    store: &mut EventStore,
    queue: &mut SyncQueue,
) -> GridResult<Resolution> {
    match pending.kind {
        ModificationKind::Move | ModificationKind::Resize => resolve_edit(pending, choice, store, queue),
        ModificationKind::Delete => resolve_delete(pending, choice, store, queue),
    }
}

fn resolve_edit(
    pending: &PendingModification,
    choice: ModificationChoice,
    store: &mut EventStore,
    queue: &mut SyncQueue,
) -> GridResult<Resolution> {
    let id = pending.event_id.as_str();
    match choice {
        ModificationChoice::Cancel => {
            store.revert_times(id, pending.original_start, pending.original_end);
            queue.remove(id);
            debug!(event_id = %id, "series edit cancelled, timing restored");
            Ok(Resolution::Cancelled)
        }
        ModificationChoice::Single => {
            store.detach_occurrence(id, pending.new_start, pending.new_end)?;
            queue.mark_dirty(id);
            Ok(Resolution::Updated {
                dirty_ids: vec![id.to_string()],
            })
        }
        ModificationChoice::Future | ModificationChoice::All => {
            let event = store
                .get(id)
                .ok_or_else(|| GridError::EventNotFound(id.to_string()))?
                .clone();
            let member_ids: Vec<String> = store
                .series_members(&event)
                .into_iter()
                .filter(|m| {
                    m.id == id
                        || choice == ModificationChoice::All
                        || m.start >= pending.original_start
                })
                .map(|m| m.id.clone())
                .collect();

            // The touched member still shows the preview times; put it
            // back so the shared delta applies from the same baseline.
            store.revert_times(id, pending.original_start, pending.original_end);

            let delta = pending.new_start - pending.original_start;
            let new_recurrence_id = Uuid::new_v4().to_string();
            store.apply_series_shift(&member_ids, delta, &new_recurrence_id);

            for member_id in &member_ids {
                queue.mark_dirty(member_id);
            }
            debug!(
                members = member_ids.len(),
                recurrence_id = %new_recurrence_id,
                "series shifted and re-keyed"
            );
            Ok(Resolution::Updated {
                dirty_ids: member_ids,
            })
        }
    }
}

fn resolve_delete(
    pending: &PendingModification,
    choice: ModificationChoice,
    store: &mut EventStore,
    queue: &mut SyncQueue,
) -> GridResult<Resolution> {
    let id = pending.event_id.as_str();
    let scope = match choice {
        ModificationChoice::Cancel => return Ok(Resolution::Cancelled),
        ModificationChoice::Single => DeleteScope::Single,
        ModificationChoice::Future => DeleteScope::Future,
        ModificationChoice::All => DeleteScope::All,
    };

    let event = store
        .get(id)
        .ok_or_else(|| GridError::EventNotFound(id.to_string()))?
        .clone();
    let recurrence_id = event.recurrence_id.clone();

    let removed_ids: Vec<String> = match scope {
        DeleteScope::Single => vec![id.to_string()],
        DeleteScope::Future => store
            .series_members(&event)
            .into_iter()
            .filter(|m| m.start >= event.start)
            .map(|m| m.id.clone())
            .collect(),
        DeleteScope::All => store
            .series_members(&event)
            .into_iter()
            .map(|m| m.id.clone())
            .collect(),
    };

    store.remove_many(&removed_ids);
    for removed in &removed_ids {
        queue.remove(removed);
    }
    debug!(removed = removed_ids.len(), ?scope, "series members removed locally");

    Ok(Resolution::Deleted {
        removed_ids,
        scope,
        recurrence_id,
    })
}
