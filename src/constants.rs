//! Shared grid and sync constants.

use std::time::Duration;

/// Vertical pixel scale of the time grid: 60px per hour, 1px per minute.
pub const PIXELS_PER_HOUR: f64 = 60.0;

/// Snap increment for all grid times, in minutes.
pub const MINUTES_INCREMENT: i64 = 15;

/// Minimum duration an event may be dragged down to, in minutes.
pub const MIN_EVENT_MINUTES: i64 = 15;

/// Day view packs overlapping events into at most this many columns.
pub const MAX_DAY_COLUMNS: usize = 6;

/// Week view subdivides a day column into at most this many columns.
pub const MAX_WEEK_COLUMNS: usize = 2;

/// Pointer distance from a scroll container edge that triggers auto-scroll.
pub const SCROLL_EDGE_THRESHOLD: f64 = 80.0;

/// Auto-scroll speed cap, in pixels per animation frame.
pub const MAX_SCROLL_SPEED: f64 = 15.0;

/// Pointer travel below this is treated as a click, not a drag (move/resize).
pub const MOVE_JITTER_PX: f64 = 3.0;

/// Pointer travel below this is treated as a click, not a drag (create).
pub const CREATE_JITTER_PX: f64 = 5.0;

/// Initial vertical scroll of a day column: 8 AM.
pub const INITIAL_SCROLL_PX: f64 = 8.0 * PIXELS_PER_HOUR;

/// Cadence of the periodic pending-change flush.
pub const SYNC_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Cadence of the remote list poll when live sync is wanted.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Id prefix of a locally created event the remote store has not seen yet.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Id prefix of a gesture-in-progress draft; never persisted.
pub const DRAFT_ID_PREFIX: &str = "draft-";

/// Id prefix of a client-side duplicated event awaiting its own save.
pub const DUPLICATE_ID_PREFIX: &str = "dup-";

/// Ids at or below this length with no persistence flags are client-local
/// placeholders and are never flushed.
pub const SHORT_ID_THRESHOLD: usize = 10;

/// Accent color applied once an event is confirmed persisted.
pub const VALIDATED_COLOR: &str = "#0f54bc";
pub const VALIDATED_COLOR1: &str = "#a8c1ff";
pub const VALIDATED_COLOR2: &str = "#4da6fb";

/// Color of the unvalidated (grey) category.
pub const UNVALIDATED_COLOR: &str = "#8c8c8c";

/// Color assigned to fresh drafts before a category is picked.
pub const DEFAULT_EVENT_COLOR: &str = "#3b82f6";

/// A calendar category: accent, fill, and validated-accent colors.
/// `color` doubles as the category discriminator for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryColor {
    pub name: &'static str,
    pub color: &'static str,
    pub color1: &'static str,
    pub color2: &'static str,
}

/// The fixed category palette.
pub const CALENDAR_COLORS: &[CategoryColor] = &[
    CategoryColor {
        name: "Validated",
        color: VALIDATED_COLOR,
        color1: VALIDATED_COLOR1,
        color2: VALIDATED_COLOR2,
    },
    CategoryColor {
        name: "Pending",
        color: UNVALIDATED_COLOR,
        color1: "#e6e6e6",
        color2: "#b3b3b3",
    },
    CategoryColor {
        name: "Contract",
        color: "#f54455",
        color1: "#ffbbcf",
        color2: "#ff6064",
    },
];

/// Look up the palette entry whose accent color matches.
pub fn category_for(color: &str) -> Option<&'static CategoryColor> {
    CALENDAR_COLORS.iter().find(|c| c.color == color)
}
