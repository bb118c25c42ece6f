//! The remote event store boundary.
//!
//! The grid consumes the remote as an injected capability: four CRUD-ish
//! calls plus a polled list query. Transport, auth, and retries beyond
//! the pending-set cycle all live behind this trait. Hosts poll `list`
//! on [`crate::constants::POLL_INTERVAL`] when live sync is wanted.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::event::Event;

/// Encode an event row the way gateway implementations put it on the
/// wire. Transient render flags are skipped by the event's own serde
/// attributes.
pub fn event_payload(event: &Event) -> GridResult<serde_json::Value> {
    serde_json::to_value(event).map_err(|e| GridError::Serialization(e.to_string()))
}

/// Decode a wire payload back into an event row.
pub fn event_from_payload(value: serde_json::Value) -> GridResult<Event> {
    serde_json::from_value(value).map_err(|e| GridError::Serialization(e.to_string()))
}

/// Server-side filter for `list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Inclusive date window; `None` on either side leaves it open.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub worker_id: Option<String>,
}

/// Scope selector for deleting a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteScope {
    Single,
    Future,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub scope: DeleteScope,
    pub recurrence_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted_count: usize,
}

/// Fields for creating a whole recurring series in one call. Distinct
/// from the re-keying the grid does when a bulk move diverges a series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Interval between occurrences, in days.
    pub every_days: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecurringResponse {
    pub recurrence_id: String,
    pub count: usize,
}

/// The remote persistence surface.
///
/// Implementations should return [`crate::GridError::RemoteNotFound`]
/// when the row is already gone; callers treat that as a soft success.
#[async_trait]
pub trait RemoteEventGateway: Send + Sync {
    async fn list(&self, filter: &EventFilter) -> GridResult<Vec<Event>>;

    /// Persist a new event; returns the durable id the store assigned.
    async fn create(&self, event: &Event) -> GridResult<String>;

    async fn update(&self, id: &str, event: &Event) -> GridResult<()>;

    async fn delete(&self, id: &str, request: &DeleteRequest) -> GridResult<DeleteResponse>;

    /// Create a full series from a base event and a cadence.
    async fn create_recurring(
        &self,
        base: &Event,
        rule: &RecurrenceRule,
    ) -> GridResult<CreateRecurringResponse>;
}
