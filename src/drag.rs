//! Pointer-drag interaction controller for the time grid.
//!
//! One `DragSession` covers one gesture from pointer-down to pointer-up:
//! creating a draft by dragging over empty grid, moving an event, or
//! resizing one of its edges. During the gesture the session emits
//! temporary updates (applied to the store without history); pointer-up
//! yields the final outcome, which either degrades to a click or carries
//! the committed times.
//!
//! Auto-scroll is modeled as a pure per-frame step; the host owns the
//! animation-frame loop and reports the resulting scroll offset back via
//! [`DragSession::set_scroll_top`], which folds into the vertical delta.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::constants::{
    CREATE_JITTER_PX, MAX_SCROLL_SPEED, MINUTES_INCREMENT, MIN_EVENT_MINUTES, MOVE_JITTER_PX,
    PIXELS_PER_HOUR, SCROLL_EDGE_THRESHOLD,
};
use crate::event::{DraftEvent, Event};
use crate::time_mapper::{day_index_from_x, midnight, snap_to_grid, time_from_offset, GridMode};

/// Viewport-relative pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

/// Where the grid sits in the viewport at drag start, and which days its
/// columns show. Captured once on pointer-down, like the DOM rect it
/// mirrors.
#[derive(Debug, Clone)]
pub struct GridGeometry {
    /// Viewport x of the grid's left edge.
    pub left: f64,
    /// Viewport y of the grid's top edge.
    pub top: f64,
    pub column_width: f64,
    /// The visible day columns, left to right.
    pub days: Vec<NaiveDate>,
    pub mode: GridMode,
}

impl GridGeometry {
    fn day_at(&self, viewport_x: f64) -> NaiveDate {
        let index = day_index_from_x(viewport_x - self.left, self.column_width, self.days.len());
        self.days.get(index).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DragKind {
    Create,
    Move { event_id: String },
    ResizeTop { event_id: String },
    ResizeBottom { event_id: String },
}

/// A temporary, render-only mutation emitted mid-gesture. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum DragUpdate {
    Move {
        event_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Resize {
        event_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Draft(DraftEvent),
}

/// The final result of a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Pointer never travelled past the jitter threshold: open the event.
    ClickEvent { event_id: String },
    /// Click on empty grid: a 1-hour event at the snapped click hour,
    /// already promoted to a transient id.
    ClickCreate { event: Event },
    /// A finalized move/resize. `original_start`/`original_end` are the
    /// pre-gesture times, needed for recurrence disambiguation and revert.
    Commit {
        event_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
        original_start: NaiveDateTime,
        original_end: NaiveDateTime,
    },
    /// A drag-created event, promoted to a transient id.
    Created { event: Event },
}

/// A single pointer gesture on the grid.
#[derive(Debug, Clone)]
pub struct DragSession {
    kind: DragKind,
    geometry: GridGeometry,
    initial_pointer: Pointer,
    initial_start: NaiveDateTime,
    initial_end: NaiveDateTime,
    initial_scroll_top: f64,
    scroll_top: f64,
    moved: bool,
    /// Create only: the day column and hour-snapped anchor time.
    create_day: Option<NaiveDate>,
    draft: Option<DraftEvent>,
}

impl DragSession {
    /// Begin moving an existing event.
    pub fn begin_move(event: &Event, pointer: Pointer, scroll_top: f64, geometry: GridGeometry) -> Self {
        let kind = DragKind::Move {
            event_id: event.id.clone(),
        };
        Self::begin_on_event(kind, event, pointer, scroll_top, geometry)
    }

    /// Begin dragging an event's top edge.
    pub fn begin_resize_top(event: &Event, pointer: Pointer, scroll_top: f64, geometry: GridGeometry) -> Self {
        let kind = DragKind::ResizeTop {
            event_id: event.id.clone(),
        };
        Self::begin_on_event(kind, event, pointer, scroll_top, geometry)
    }

    /// Begin dragging an event's bottom edge.
    pub fn begin_resize_bottom(event: &Event, pointer: Pointer, scroll_top: f64, geometry: GridGeometry) -> Self {
        let kind = DragKind::ResizeBottom {
            event_id: event.id.clone(),
        };
        Self::begin_on_event(kind, event, pointer, scroll_top, geometry)
    }

    fn begin_on_event(
        kind: DragKind,
        event: &Event,
        pointer: Pointer,
        scroll_top: f64,
        geometry: GridGeometry,
    ) -> Self {
        DragSession {
            kind,
            geometry,
            initial_pointer: pointer,
            initial_start: event.start,
            initial_end: event.end,
            initial_scroll_top: scroll_top,
            scroll_top,
            moved: false,
            create_day: None,
            draft: None,
        }
    }

    /// Begin a drag-to-create on empty grid. Synthesizes a 1-hour draft
    /// anchored at the clicked hour.
    pub fn begin_create(pointer: Pointer, geometry: GridGeometry) -> Self {
        let day = geometry.day_at(pointer.x);
        let anchor = time_from_offset(pointer.y - geometry.top, day, true, geometry.mode);
        let draft = DraftEvent::new(anchor, anchor + Duration::hours(1));
        DragSession {
            kind: DragKind::Create,
            geometry,
            initial_pointer: pointer,
            initial_start: anchor,
            initial_end: anchor + Duration::hours(1),
            initial_scroll_top: 0.0,
            scroll_top: 0.0,
            moved: false,
            create_day: Some(day),
            draft: Some(draft),
        }
    }

    /// The live draft, if this is a create gesture.
    pub fn draft(&self) -> Option<&DraftEvent> {
        self.draft.as_ref()
    }

    /// Report the scroll container's current offset so auto-scroll folds
    /// into the vertical delta.
    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        if !matches!(self.kind, DragKind::Create) {
            self.scroll_top = scroll_top;
        }
    }

    /// Vertical pointer delta adjusted for any auto-scroll since drag start.
    fn delta_y(&self, pointer: Pointer) -> f64 {
        (pointer.y - self.initial_pointer.y) + (self.scroll_top - self.initial_scroll_top)
    }

    fn minutes_delta(&self, pointer: Pointer) -> i64 {
        let minutes_per_pixel = 60.0 / PIXELS_PER_HOUR;
        let raw = self.delta_y(pointer) * minutes_per_pixel;
        (raw / MINUTES_INCREMENT as f64).round() as i64 * MINUTES_INCREMENT
    }

    fn track_movement(&mut self, pointer: Pointer) {
        let threshold = match self.kind {
            DragKind::Create => CREATE_JITTER_PX,
            _ => MOVE_JITTER_PX,
        };
        let dx = (pointer.x - self.initial_pointer.x).abs();
        let dy = match self.kind {
            // Create tracks raw pointer travel; move/resize fold scroll in.
            DragKind::Create => (pointer.y - self.initial_pointer.y).abs(),
            _ => self.delta_y(pointer).abs(),
        };
        if dy > threshold || dx > threshold {
            self.moved = true;
        }
    }

    /// Process a pointer move. Returns the temporary mutation to render,
    /// or `None` when the move is rejected (resize inversion) or the
    /// pointer has not yet travelled past the jitter threshold.
    pub fn pointer_move(&mut self, pointer: Pointer) -> Option<DragUpdate> {
        self.track_movement(pointer);

        // Still a potential click: emit nothing, so degrading to a click
        // leaves the store untouched.
        if !self.moved {
            return None;
        }

        match &self.kind {
            DragKind::Move { event_id } => {
                let event_id = event_id.clone();
                let (start, end) = self.moved_interval(pointer);
                Some(DragUpdate::Move {
                    event_id,
                    start,
                    end,
                })
            }
            DragKind::ResizeTop { event_id } => {
                let new_start = snap_to_grid(
                    self.initial_start + Duration::minutes(self.minutes_delta(pointer)),
                );
                // Inverting past the fixed end is silently rejected.
                (new_start < self.initial_end).then(|| DragUpdate::Resize {
                    event_id: event_id.clone(),
                    start: new_start,
                    end: self.initial_end,
                })
            }
            DragKind::ResizeBottom { event_id } => {
                let new_end = snap_to_grid(
                    self.initial_end + Duration::minutes(self.minutes_delta(pointer)),
                );
                (new_end > self.initial_start).then(|| DragUpdate::Resize {
                    event_id: event_id.clone(),
                    start: self.initial_start,
                    end: new_end,
                })
            }
            DragKind::Create => {
                let (start, end) = self.created_interval(pointer);
                let draft = self.draft.as_mut()?;
                draft.start = start;
                draft.end = end;
                Some(DragUpdate::Draft(draft.clone()))
            }
        }
    }

    /// Finish the gesture.
    pub fn pointer_up(mut self, pointer: Pointer) -> DragOutcome {
        self.track_movement(pointer);

        if !self.moved {
            return match &self.kind {
                // Plain click: 1-hour event at the snapped click hour.
                DragKind::Create => DragOutcome::ClickCreate {
                    event: DraftEvent::new(self.initial_start, self.initial_end).promote(),
                },
                DragKind::Move { event_id }
                | DragKind::ResizeTop { event_id }
                | DragKind::ResizeBottom { event_id } => DragOutcome::ClickEvent {
                    event_id: event_id.clone(),
                },
            };
        }

        match self.kind.clone() {
            DragKind::Move { event_id } => {
                let (start, end) = self.moved_interval(pointer);
                DragOutcome::Commit {
                    event_id,
                    start,
                    end,
                    original_start: self.initial_start,
                    original_end: self.initial_end,
                }
            }
            DragKind::ResizeTop { event_id } => {
                let new_start = snap_to_grid(
                    self.initial_start + Duration::minutes(self.minutes_delta(pointer)),
                );
                let start = if new_start < self.initial_end {
                    new_start
                } else {
                    // Inverted resize retains the pre-drag value.
                    self.initial_start
                };
                DragOutcome::Commit {
                    event_id,
                    start,
                    end: self.initial_end,
                    original_start: self.initial_start,
                    original_end: self.initial_end,
                }
            }
            DragKind::ResizeBottom { event_id } => {
                let new_end = snap_to_grid(
                    self.initial_end + Duration::minutes(self.minutes_delta(pointer)),
                );
                let end = if new_end > self.initial_start {
                    new_end
                } else {
                    self.initial_end
                };
                DragOutcome::Commit {
                    event_id,
                    start: self.initial_start,
                    end,
                    original_start: self.initial_start,
                    original_end: self.initial_end,
                }
            }
            DragKind::Create => {
                let (start, end) = self.created_interval(pointer);
                match self.draft.take() {
                    Some(mut draft) => {
                        draft.start = start;
                        draft.end = end;
                        DragOutcome::Created {
                            event: draft.promote(),
                        }
                    }
                    None => DragOutcome::Created {
                        event: DraftEvent::new(start, end).promote(),
                    },
                }
            }
        }
    }

    /// Target interval for a move: day from the pointer's X, minutes from
    /// the vertical delta, with day wrap when the minutes carry across
    /// midnight. Duration is preserved.
    fn moved_interval(&self, pointer: Pointer) -> (NaiveDateTime, NaiveDateTime) {
        let base_day = self.geometry.day_at(pointer.x);
        let minutes_delta = self.minutes_delta(pointer);

        let start_minutes =
            self.initial_start.time().hour() as i64 * 60 + self.initial_start.time().minute() as i64;
        let total_minutes = start_minutes + minutes_delta;

        let day_offset = total_minutes.div_euclid(24 * 60);
        let wrapped_minutes = total_minutes.rem_euclid(24 * 60);

        let target =
            midnight(base_day) + Duration::days(day_offset) + Duration::minutes(wrapped_minutes);

        let start = snap_to_grid(target);
        let end = start + (self.initial_end - self.initial_start);
        (start, end)
    }

    /// Direction-aware interval for a create drag, clamped to the day
    /// column's window.
    fn created_interval(&self, pointer: Pointer) -> (NaiveDateTime, NaiveDateTime) {
        let day = self
            .create_day
            .unwrap_or_else(|| self.geometry.day_at(self.initial_pointer.x));
        let current = time_from_offset(
            pointer.y - self.geometry.top,
            day,
            false,
            self.geometry.mode,
        );
        let anchor = self.initial_start;

        let noon = Duration::hours(12);
        let (day_start, day_end) = match self.geometry.mode {
            GridMode::Standard => (
                midnight(day),
                midnight(day) + Duration::days(1) - Duration::milliseconds(1),
            ),
            GridMode::Night => (midnight(day) + noon, midnight(day + Duration::days(1)) + noon),
        };

        let min_duration = Duration::minutes(MIN_EVENT_MINUTES);

        let (mut start, mut end) = if current < anchor {
            // Dragging upward: anchor becomes the bottom, 1h shown minimum.
            (snap_to_grid(current), snap_to_grid(anchor + Duration::hours(1)))
        } else {
            let start = snap_to_grid(anchor);
            let mut end = snap_to_grid(current);
            if end - start < min_duration {
                end = start + min_duration;
            }
            (start, end)
        };

        if start < day_start {
            start = day_start;
            end = start + Duration::hours(1);
        }
        if end > day_end {
            end = day_end;
            if end - start < min_duration {
                start = end - min_duration;
                if start < day_start {
                    start = day_start;
                    end = start + min_duration;
                }
            }
        }

        (start, end)
    }
}

/// Per-frame auto-scroll step while a move/resize pointer sits within
/// [`SCROLL_EDGE_THRESHOLD`] of the scroll container's top or bottom
/// edge. Speed grows as the pointer nears the edge, capped at
/// [`MAX_SCROLL_SPEED`]. Returns `None` outside the edge zones, which is
/// the loop's cue to stop.
pub fn auto_scroll_step(pointer_y: f64, container_top: f64, container_bottom: f64) -> Option<f64> {
    let from_top = pointer_y - container_top;
    let from_bottom = container_bottom - pointer_y;

    if from_top < SCROLL_EDGE_THRESHOLD && from_top > 0.0 {
        let speed = ((SCROLL_EDGE_THRESHOLD - from_top) / 5.0).floor().min(MAX_SCROLL_SPEED);
        (speed != 0.0).then_some(-speed)
    } else if from_bottom < SCROLL_EDGE_THRESHOLD && from_bottom > 0.0 {
        let speed = ((SCROLL_EDGE_THRESHOLD - from_bottom) / 5.0).floor().min(MAX_SCROLL_SPEED);
        (speed != 0.0).then_some(speed)
    } else {
        None
    }
}

/// Apply a scroll step, clamped to the container's scrollable range.
pub fn apply_scroll(scroll_top: f64, step: f64, max_scroll: f64) -> f64 {
    (scroll_top + step).clamp(0.0, max_scroll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn dt(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    fn week_geometry() -> GridGeometry {
        GridGeometry {
            left: 0.0,
            top: 0.0,
            column_width: 100.0,
            days: (0..7).map(|i| day() + Duration::days(i)).collect(),
            mode: GridMode::Standard,
        }
    }

    fn event_at(h: u32) -> Event {
        Event::new("evt42xyz9001", dt(day(), h, 0), dt(day(), h + 1, 0))
    }

    #[test]
    fn test_zero_delta_release_degrades_to_click() {
        let event = event_at(9);
        let pointer = Pointer { x: 50.0, y: 540.0 };
        let session = DragSession::begin_move(&event, pointer, 0.0, week_geometry());
        match session.pointer_up(pointer) {
            DragOutcome::ClickEvent { event_id } => assert_eq!(event_id, event.id),
            other => panic!("expected click, got {other:?}"),
        }
    }

    #[test]
    fn test_jitter_below_threshold_still_clicks() {
        let event = event_at(9);
        let start = Pointer { x: 50.0, y: 540.0 };
        let mut session = DragSession::begin_move(&event, start, 0.0, week_geometry());
        session.pointer_move(Pointer { x: 52.0, y: 542.0 });
        match session.pointer_up(Pointer { x: 52.0, y: 542.0 }) {
            DragOutcome::ClickEvent { .. } => {}
            other => panic!("expected click, got {other:?}"),
        }
    }

    #[test]
    fn test_move_shifts_by_snapped_minutes() {
        let event = event_at(9);
        let start = Pointer { x: 50.0, y: 540.0 };
        let mut session = DragSession::begin_move(&event, start, 0.0, week_geometry());
        // 30px down = 30 minutes
        let update = session.pointer_move(Pointer { x: 50.0, y: 570.0 }).unwrap();
        match update {
            DragUpdate::Move { start, end, .. } => {
                assert_eq!(start, dt(day(), 9, 30));
                assert_eq!(end, dt(day(), 10, 30));
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn test_move_preserves_duration_across_days() {
        let event = event_at(9);
        let start = Pointer { x: 50.0, y: 540.0 };
        let mut session = DragSession::begin_move(&event, start, 0.0, week_geometry());
        // Third column, same vertical position.
        let update = session.pointer_move(Pointer { x: 250.0, y: 540.1 }).unwrap();
        match update {
            DragUpdate::Move { start, end, .. } => {
                assert_eq!(start, dt(day() + Duration::days(2), 9, 0));
                assert_eq!(end - start, Duration::hours(1));
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn test_move_wraps_past_midnight_to_next_day() {
        // 23:00 event dragged 120px (2h) down lands at 01:00 next day.
        let event = Event::new("evt42xyz9001", dt(day(), 23, 0), dt(day(), 23, 45));
        let start = Pointer { x: 50.0, y: 0.0 };
        let mut session = DragSession::begin_move(&event, start, 0.0, week_geometry());
        let update = session.pointer_move(Pointer { x: 50.0, y: 120.0 }).unwrap();
        match update {
            DragUpdate::Move { start, .. } => {
                assert_eq!(start, dt(day() + Duration::days(1), 1, 0));
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn test_move_wraps_upward_to_previous_day() {
        let event = Event::new("evt42xyz9001", dt(day(), 0, 30), dt(day(), 1, 30));
        let start = Pointer { x: 50.0, y: 30.0 };
        let mut session = DragSession::begin_move(&event, start, 0.0, week_geometry());
        let update = session.pointer_move(Pointer { x: 50.0, y: -90.0 }).unwrap();
        match update {
            DragUpdate::Move { start, .. } => {
                assert_eq!(start, dt(day() - Duration::days(1), 22, 30));
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn test_auto_scroll_folds_into_delta() {
        let event = event_at(9);
        let start = Pointer { x: 50.0, y: 540.0 };
        let mut session = DragSession::begin_move(&event, start, 100.0, week_geometry());
        session.set_scroll_top(160.0); // scrolled 60px down during drag
        let update = session.pointer_move(start).unwrap();
        match update {
            DragUpdate::Move { start, .. } => assert_eq!(start, dt(day(), 10, 0)),
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_bottom_snaps_and_commits() {
        // End 09:00 -> dragged to 09:22 snaps to 09:15.
        let event = Event::new("evt42xyz9001", dt(day(), 8, 0), dt(day(), 9, 0));
        let start = Pointer { x: 50.0, y: 540.0 };
        let mut session = DragSession::begin_resize_bottom(&event, start, 0.0, week_geometry());
        session.pointer_move(Pointer { x: 50.0, y: 562.0 });
        match session.pointer_up(Pointer { x: 50.0, y: 562.0 }) {
            DragOutcome::Commit { start, end, .. } => {
                assert_eq!(start, dt(day(), 8, 0));
                // 22px ~ 22min, snapped delta 15min
                assert_eq!(end, dt(day(), 9, 15));
            }
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_top_inversion_is_rejected() {
        let event = event_at(9);
        let start = Pointer { x: 50.0, y: 540.0 };
        let mut session = DragSession::begin_resize_top(&event, start, 0.0, week_geometry());
        // Drag 2h down, past the fixed end: no temporary update.
        assert!(session.pointer_move(Pointer { x: 50.0, y: 660.0 }).is_none());
        // And the commit retains the pre-drag start.
        match session.pointer_up(Pointer { x: 50.0, y: 660.0 }) {
            DragOutcome::Commit { start, end, .. } => {
                assert_eq!(start, dt(day(), 9, 0));
                assert_eq!(end, dt(day(), 10, 0));
            }
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn test_click_create_snaps_to_hour() {
        // y=480 -> 08:00, 1-hour event.
        let pointer = Pointer { x: 150.0, y: 480.0 };
        let session = DragSession::begin_create(pointer, week_geometry());
        match session.pointer_up(pointer) {
            DragOutcome::ClickCreate { event } => {
                assert!(event.has_temp_id());
                assert_eq!(event.start, dt(day() + Duration::days(1), 8, 0));
                assert_eq!(event.end, dt(day() + Duration::days(1), 9, 0));
            }
            other => panic!("expected click-create, got {other:?}"),
        }
    }

    #[test]
    fn test_drag_create_downward_extends_end() {
        let pointer = Pointer { x: 50.0, y: 480.0 };
        let mut session = DragSession::begin_create(pointer, week_geometry());
        let update = session.pointer_move(Pointer { x: 50.0, y: 630.0 }).unwrap();
        match update {
            DragUpdate::Draft(draft) => {
                assert_eq!(draft.start, dt(day(), 8, 0));
                assert_eq!(draft.end, dt(day(), 10, 30));
            }
            other => panic!("expected draft, got {other:?}"),
        }
    }

    #[test]
    fn test_drag_create_upward_keeps_anchor_bottom() {
        let pointer = Pointer { x: 50.0, y: 480.0 };
        let mut session = DragSession::begin_create(pointer, week_geometry());
        let update = session.pointer_move(Pointer { x: 50.0, y: 360.0 }).unwrap();
        match update {
            DragUpdate::Draft(draft) => {
                assert_eq!(draft.start, dt(day(), 6, 0));
                assert_eq!(draft.end, dt(day(), 9, 0));
            }
            other => panic!("expected draft, got {other:?}"),
        }
    }

    #[test]
    fn test_drag_create_enforces_minimum_duration() {
        let pointer = Pointer { x: 50.0, y: 480.0 };
        let mut session = DragSession::begin_create(pointer, week_geometry());
        // 6px of travel: past the jitter threshold but under 15 minutes.
        let update = session.pointer_move(Pointer { x: 50.0, y: 486.0 }).unwrap();
        match update {
            DragUpdate::Draft(draft) => {
                assert_eq!(draft.end - draft.start, Duration::minutes(15));
            }
            other => panic!("expected draft, got {other:?}"),
        }
    }

    #[test]
    fn test_drag_create_commits_promoted_event() {
        let pointer = Pointer { x: 50.0, y: 480.0 };
        let mut session = DragSession::begin_create(pointer, week_geometry());
        session.pointer_move(Pointer { x: 50.0, y: 600.0 });
        match session.pointer_up(Pointer { x: 50.0, y: 600.0 }) {
            DragOutcome::Created { event } => {
                assert!(event.has_temp_id());
                assert_eq!(event.start, dt(day(), 8, 0));
                assert_eq!(event.end, dt(day(), 10, 0));
            }
            other => panic!("expected created, got {other:?}"),
        }
    }

    #[test]
    fn test_night_create_clamps_to_shift_window() {
        let mut geometry = week_geometry();
        geometry.mode = GridMode::Night;
        let pointer = Pointer { x: 50.0, y: 60.0 }; // 13:00 anchor
        let mut session = DragSession::begin_create(pointer, geometry);
        // Drag far above the window top.
        let update = session.pointer_move(Pointer { x: 50.0, y: -300.0 }).unwrap();
        match update {
            DragUpdate::Draft(draft) => {
                assert_eq!(draft.start, dt(day(), 12, 0));
            }
            other => panic!("expected draft, got {other:?}"),
        }
    }

    #[test]
    fn test_auto_scroll_step_zones() {
        // Outside either 80px edge zone: no scroll.
        assert_eq!(auto_scroll_step(400.0, 100.0, 700.0), None);
        // 30px from the top edge: scroll up at floor((80-30)/5) = 10.
        assert_eq!(auto_scroll_step(130.0, 100.0, 700.0), Some(-10.0));
        // 10px from the bottom edge: capped downward speed.
        assert_eq!(auto_scroll_step(690.0, 100.0, 700.0), Some(14.0));
        // 2px from the bottom: hits the cap.
        assert_eq!(auto_scroll_step(698.0, 100.0, 700.0), Some(15.0));
        // Past the edge entirely: the zone test is exclusive.
        assert_eq!(auto_scroll_step(100.0, 100.0, 700.0), None);
    }

    #[test]
    fn test_apply_scroll_clamps() {
        assert_eq!(apply_scroll(5.0, -15.0, 800.0), 0.0);
        assert_eq!(apply_scroll(795.0, 15.0, 800.0), 800.0);
        assert_eq!(apply_scroll(100.0, 15.0, 800.0), 115.0);
    }

    #[test]
    fn test_drag_commit_roundtrip_preserves_times() {
        // Start a move and release with zero net delta after a wiggle
        // below threshold: times must be bit-identical.
        let event = event_at(9);
        let p = Pointer { x: 50.0, y: 540.0 };
        let mut session = DragSession::begin_move(&event, p, 0.0, week_geometry());
        session.pointer_move(Pointer { x: 51.0, y: 541.0 });
        let outcome = session.pointer_up(p);
        assert!(matches!(outcome, DragOutcome::ClickEvent { .. }));
        assert_eq!(event.start.hour(), 9);
        assert_eq!(event.end.hour(), 10);
    }

    #[test]
    fn test_sub_jitter_wiggle_leaves_store_untouched() {
        // An unsnapped 09:07 event would preview at 09:00 if a sub-jitter
        // move leaked an update; a gesture that degrades to a click must
        // never have touched the store.
        use crate::store::EventStore;

        let event = Event::new("evt42xyz9001", dt(day(), 9, 7), dt(day(), 10, 7));
        let mut store = EventStore::with_events(vec![event.clone()]);
        let origin = Pointer { x: 50.0, y: 547.0 };
        let mut session = DragSession::begin_move(&event, origin, 0.0, week_geometry());

        let update = session.pointer_move(Pointer { x: 50.0, y: 549.0 });
        assert!(update.is_none());
        if let Some(DragUpdate::Move { event_id, start, end }) = update {
            store.apply_temporary_move(&event_id, start, end);
        }

        match session.pointer_up(origin) {
            DragOutcome::ClickEvent { event_id } => assert_eq!(event_id, event.id),
            other => panic!("expected click, got {other:?}"),
        }
        let stored = store.get(&event.id).unwrap();
        assert_eq!(stored.start, dt(day(), 9, 7));
        assert!(!stored.is_being_moved);
    }

    #[test]
    fn test_empty_day_list_falls_back_without_panic() {
        let geometry = GridGeometry {
            left: 0.0,
            top: 0.0,
            column_width: 100.0,
            days: Vec::new(),
            mode: GridMode::Standard,
        };
        let mut session = DragSession::begin_create(Pointer { x: 50.0, y: 480.0 }, geometry);
        session.pointer_move(Pointer { x: 50.0, y: 540.0 });
        match session.pointer_up(Pointer { x: 50.0, y: 540.0 }) {
            DragOutcome::Created { event } => assert_eq!(event.duration(), Duration::hours(1)),
            other => panic!("expected created, got {other:?}"),
        }
    }
}
