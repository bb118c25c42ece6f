//! Core logic for a day/week scheduling grid.
//!
//! The grid places, moves, resizes, and repeats time-boxed events on a
//! vertical time axis and reconciles edits with a remote store under an
//! optimistic-update model:
//! - `time_mapper` converts between pixel offsets and instants
//! - `layout` assigns overlapping events their columns
//! - `drag` drives create/move/resize pointer gestures
//! - `recurrence` disambiguates edits touching a recurring series
//! - `store` holds the live list, history, and selection
//! - `sync` flushes pending local edits through the gateway
//! - `filter` and `config` carry category visibility and saved prefs

pub mod config;
pub mod constants;
pub mod drag;
pub mod error;
pub mod event;
pub mod filter;
pub mod layout;
pub mod recurrence;
pub mod remote;
pub mod store;
pub mod sync;
pub mod time_mapper;

pub use config::GridPrefs;
pub use drag::{auto_scroll_step, DragOutcome, DragSession, DragUpdate, GridGeometry, Pointer};
pub use error::{GridError, GridResult};
pub use event::{DraftEvent, Event};
pub use filter::{effective_color, palette_for, CategoryFilter};
pub use layout::{PlacedEvent, ViewMode};
pub use recurrence::{
    CommitDisposition, ModificationChoice, ModificationKind, PendingModification, Resolution,
};
pub use remote::{DeleteScope, EventFilter, RemoteEventGateway};
pub use store::EventStore;
pub use sync::{DrainReport, FlushTrigger, SyncQueue};
pub use time_mapper::GridMode;
