//! Write-behind persistence of local mutations.
//!
//! The queue tracks event ids with unflushed local edits. Three triggers
//! funnel into one drain routine: the periodic timer, the page going
//! hidden, and an explicit caller flush. Each drain pushes eligible rows
//! through the gateway; failures stay pending and retry on the next
//! drain, with no separate backoff schedule.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::constants::{
    DRAFT_ID_PREFIX, DUPLICATE_ID_PREFIX, POLL_INTERVAL, SHORT_ID_THRESHOLD, SYNC_INTERVAL,
    TEMP_ID_PREFIX,
};
use crate::error::{GridError, GridResult};
use crate::event::Event;
use crate::remote::{DeleteRequest, DeleteScope, RemoteEventGateway};
use crate::store::EventStore;

/// What prompted a drain. Logged, not branched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    Interval,
    VisibilityHidden,
    Explicit,
}

/// Outcome counts of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Updates the remote accepted.
    pub flushed: usize,
    /// Entries dropped without a remote call (ineligible, vanished, or
    /// already deleted remotely).
    pub dropped: usize,
    /// Entries that failed and stay pending.
    pub failed: usize,
}

/// Should this event ever be flushed? Rows the remote already knows, or
/// that were explicitly validated, always qualify. Otherwise the id must
/// look durable: no transient prefix and longer than the placeholder
/// length.
pub fn is_eligible(event: &Event) -> bool {
    if event.from_database || event.is_validated == Some(true) {
        return true;
    }
    let id = event.id.as_str();
    !id.starts_with(TEMP_ID_PREFIX)
        && !id.starts_with(DRAFT_ID_PREFIX)
        && !id.starts_with(DUPLICATE_ID_PREFIX)
        && id.len() > SHORT_ID_THRESHOLD
}

#[derive(Debug, Default)]
pub struct SyncQueue {
    pending: HashSet<String>,
    last_flush: Option<DateTime<Utc>>,
}

impl SyncQueue {
    pub fn new() -> Self {
        SyncQueue::default()
    }

    /// Record an unflushed local mutation.
    pub fn mark_dirty(&mut self, id: &str) {
        self.pending.insert(id.to_string());
    }

    /// Drop an id without flushing it (cancelled edit, local delete).
    pub fn remove(&mut self, id: &str) {
        self.pending.remove(id);
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    pub fn pending(&self) -> &HashSet<String> {
        &self.pending
    }

    pub fn last_flush(&self) -> Option<DateTime<Utc>> {
        self.last_flush
    }

    /// A remote create re-keyed a row; carry its dirty state over.
    pub fn rekey(&mut self, old_id: &str, new_id: &str) {
        if self.pending.remove(old_id) {
            self.pending.insert(new_id.to_string());
        }
    }

    /// Flush every pending, eligible row through the gateway. Rows absent
    /// from the store or ineligible are dropped without a call; a
    /// remote-side not-found is a soft success. Failures stay pending.
    pub async fn drain(
        &mut self,
        store: &EventStore,
        gateway: &dyn RemoteEventGateway,
        trigger: FlushTrigger,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        let ids: Vec<String> = self.pending.iter().cloned().collect();
        debug!(?trigger, pending = ids.len(), "draining pending changes");

        for id in ids {
            let Some(event) = store.get(&id) else {
                self.pending.remove(&id);
                report.dropped += 1;
                continue;
            };
            if !is_eligible(event) {
                self.pending.remove(&id);
                report.dropped += 1;
                continue;
            }
            match gateway.update(&id, event).await {
                Ok(()) => {
                    self.pending.remove(&id);
                    report.flushed += 1;
                }
                Err(GridError::RemoteNotFound(_)) => {
                    debug!(event_id = %id, "row gone remotely, clearing pending entry");
                    self.pending.remove(&id);
                    report.dropped += 1;
                }
                Err(err) => {
                    warn!(event_id = %id, error = %err, "flush failed, will retry");
                    report.failed += 1;
                }
            }
        }

        if report.flushed > 0 {
            self.last_flush = Some(Utc::now());
        }
        report
    }
}

/// Tick source for the periodic flush. The first tick fires after a full
/// interval, not immediately; a host loop awaits it and calls
/// [`SyncQueue::drain`] with [`FlushTrigger::Interval`].
pub fn flush_ticker() -> tokio::time::Interval {
    let start = tokio::time::Instant::now() + SYNC_INTERVAL;
    let mut interval = tokio::time::interval_at(start, SYNC_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval
}

/// Tick source for the remote list poll when live sync is wanted.
pub fn poll_ticker() -> tokio::time::Interval {
    let start = tokio::time::Instant::now() + POLL_INTERVAL;
    let mut interval = tokio::time::interval_at(start, POLL_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval
}

/// Persist a locally created row: issue the create, adopt the durable id
/// the remote assigned, and carry any pending entry over to it. Returns
/// the durable id.
pub async fn persist_new(
    store: &mut EventStore,
    queue: &mut SyncQueue,
    gateway: &dyn RemoteEventGateway,
    id: &str,
) -> GridResult<String> {
    let event = store
        .get(id)
        .ok_or_else(|| GridError::EventNotFound(id.to_string()))?
        .clone();
    let durable_id = gateway.create(&event).await?;
    store.adopt_remote_id(id, &durable_id)?;
    queue.rekey(id, &durable_id);
    debug!(old_id = %id, new_id = %durable_id, "created row adopted durable id");
    Ok(durable_id)
}

/// Drive a remote delete. A remote-side not-found is a soft success
/// reported as zero rows.
pub async fn push_delete(
    gateway: &dyn RemoteEventGateway,
    id: &str,
    scope: DeleteScope,
    recurrence_id: Option<String>,
) -> GridResult<usize> {
    let request = DeleteRequest {
        scope,
        recurrence_id,
    };
    match gateway.delete(id, &request).await {
        Ok(response) => Ok(response.deleted_count),
        Err(GridError::RemoteNotFound(_)) => {
            debug!(event_id = %id, "delete target already gone remotely");
            Ok(0)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::Mutex;

    use crate::remote::{CreateRecurringResponse, DeleteResponse, EventFilter, RecurrenceRule};

    fn dt(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    /// Gateway fake recording calls; ids listed in `fail` error out,
    /// ids in `gone` answer not-found.
    #[derive(Default)]
    struct RecordingGateway {
        updates: Mutex<Vec<String>>,
        fail: Vec<String>,
        gone: Vec<String>,
    }

    #[async_trait::async_trait]
    impl RemoteEventGateway for RecordingGateway {
        async fn list(&self, _filter: &EventFilter) -> GridResult<Vec<Event>> {
            Ok(Vec::new())
        }

        async fn create(&self, _event: &Event) -> GridResult<String> {
            Ok("durable12345".to_string())
        }

        async fn update(&self, id: &str, _event: &Event) -> GridResult<()> {
            if self.fail.iter().any(|f| f == id) {
                return Err(GridError::Remote("boom".into()));
            }
            if self.gone.iter().any(|g| g == id) {
                return Err(GridError::RemoteNotFound(id.to_string()));
            }
            self.updates.lock().unwrap().push(id.to_string());
            Ok(())
        }

        async fn delete(&self, id: &str, _request: &DeleteRequest) -> GridResult<DeleteResponse> {
            if self.gone.iter().any(|g| g == id) {
                return Err(GridError::RemoteNotFound(id.to_string()));
            }
            Ok(DeleteResponse { deleted_count: 1 })
        }

        async fn create_recurring(
            &self,
            _base: &Event,
            _rule: &RecurrenceRule,
        ) -> GridResult<CreateRecurringResponse> {
            Ok(CreateRecurringResponse {
                recurrence_id: "rec12345678".to_string(),
                count: 0,
            })
        }
    }

    fn database_event(id: &str) -> Event {
        let mut e = Event::new(id, dt(9), dt(10));
        e.from_database = true;
        e
    }

    #[test]
    fn test_temp_id_is_never_eligible() {
        let e = Event::new("temp-1717320000000", dt(9), dt(10));
        assert!(!is_eligible(&e));
    }

    #[test]
    fn test_database_and_validated_rows_are_eligible() {
        assert!(is_eligible(&database_event("shiftalpha01")));
        let mut e = Event::new("temp-1717320000000", dt(9), dt(10));
        e.is_validated = Some(true);
        assert!(is_eligible(&e));
    }

    #[test]
    fn test_short_unflagged_id_is_ineligible() {
        let e = Event::new("abc123", dt(9), dt(10));
        assert!(!is_eligible(&e));
        let e = Event::new("longdurable1", dt(9), dt(10));
        assert!(is_eligible(&e));
    }

    #[tokio::test]
    async fn test_drain_flushes_once_and_clears() {
        let mut store = EventStore::new();
        store.insert(database_event("shiftalpha01"));
        let mut queue = SyncQueue::new();
        queue.mark_dirty("shiftalpha01");

        let gateway = RecordingGateway::default();
        let report = queue.drain(&store, &gateway, FlushTrigger::Interval).await;
        assert_eq!(report.flushed, 1);
        assert!(!queue.is_pending("shiftalpha01"));
        assert!(queue.last_flush().is_some());

        // A second drain with nothing pending issues no call.
        let report = queue.drain(&store, &gateway, FlushTrigger::Explicit).await;
        assert_eq!(report, DrainReport::default());
        assert_eq!(gateway.updates.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_drain_skips_ineligible_without_remote_call() {
        let mut store = EventStore::new();
        store.insert(Event::new("temp-1717320000000", dt(9), dt(10)));
        let mut queue = SyncQueue::new();
        queue.mark_dirty("temp-1717320000000");

        let gateway = RecordingGateway::default();
        let report = queue.drain(&store, &gateway, FlushTrigger::Interval).await;
        assert_eq!(report.dropped, 1);
        assert!(queue.pending().is_empty());
        assert!(gateway.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drain_drops_ids_missing_from_store() {
        let store = EventStore::new();
        let mut queue = SyncQueue::new();
        queue.mark_dirty("shiftalpha01");
        let gateway = RecordingGateway::default();
        let report = queue
            .drain(&store, &gateway, FlushTrigger::VisibilityHidden)
            .await;
        assert_eq!(report.dropped, 1);
        assert!(queue.pending().is_empty());
    }

    #[tokio::test]
    async fn test_failed_flush_stays_pending() {
        let mut store = EventStore::new();
        store.insert(database_event("shiftalpha01"));
        let mut queue = SyncQueue::new();
        queue.mark_dirty("shiftalpha01");

        let gateway = RecordingGateway {
            fail: vec!["shiftalpha01".to_string()],
            ..Default::default()
        };
        let report = queue.drain(&store, &gateway, FlushTrigger::Interval).await;
        assert_eq!(report.failed, 1);
        assert!(queue.is_pending("shiftalpha01"));
        assert!(queue.last_flush().is_none());
    }

    #[tokio::test]
    async fn test_remote_not_found_clears_pending() {
        let mut store = EventStore::new();
        store.insert(database_event("shiftalpha01"));
        let mut queue = SyncQueue::new();
        queue.mark_dirty("shiftalpha01");

        let gateway = RecordingGateway {
            gone: vec!["shiftalpha01".to_string()],
            ..Default::default()
        };
        let report = queue.drain(&store, &gateway, FlushTrigger::Interval).await;
        assert_eq!(report.dropped, 1);
        assert!(!queue.is_pending("shiftalpha01"));
    }

    #[tokio::test]
    async fn test_persist_new_adopts_durable_id() {
        let mut store = EventStore::new();
        store.insert(Event::new("temp-1717320000000", dt(9), dt(10)));
        let mut queue = SyncQueue::new();
        queue.mark_dirty("temp-1717320000000");

        let gateway = RecordingGateway::default();
        let durable = persist_new(&mut store, &mut queue, &gateway, "temp-1717320000000")
            .await
            .unwrap();
        assert_eq!(durable, "durable12345");
        assert!(store.contains("durable12345"));
        assert!(!queue.is_pending("temp-1717320000000"));
        assert!(queue.is_pending("durable12345"));
    }

    #[tokio::test]
    async fn test_push_delete_soft_success_when_gone() {
        let gateway = RecordingGateway {
            gone: vec!["shiftalpha01".to_string()],
            ..Default::default()
        };
        let deleted = push_delete(&gateway, "shiftalpha01", DeleteScope::Single, None)
            .await
            .unwrap();
        assert_eq!(deleted, 0);
    }
}
