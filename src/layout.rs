//! Column layout for overlapping events within one day column.
//!
//! Day view has room for true multi-column packing, so it greedily bin
//! packs into up to six columns. Week view columns are too narrow for
//! that to stay legible, so it only stacks an event over another when one
//! interval fully contains the other (a lunch break inside a shift), and
//! otherwise just flags the visual collision at full width.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DAY_COLUMNS, MAX_WEEK_COLUMNS};
use crate::event::Event;

/// Which layout policy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
}

/// An event annotated with its column placement for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEvent {
    pub event: Event,
    /// Column index within the day column; `0 <= column < total_columns`.
    pub column: usize,
    /// Number of columns the day column is subdivided into; always >= 1.
    pub total_columns: usize,
    /// A collision that the layout did not (or could not) resolve by
    /// subdividing width.
    pub is_overlapping: bool,
}

impl PlacedEvent {
    fn full_width(event: Event) -> Self {
        PlacedEvent {
            event,
            column: 0,
            total_columns: 1,
            is_overlapping: false,
        }
    }
}

/// Assign columns to one day's events.
pub fn layout(day_events: &[Event], view: ViewMode) -> Vec<PlacedEvent> {
    if day_events.is_empty() {
        return Vec::new();
    }

    let mut placed: Vec<PlacedEvent> = day_events
        .iter()
        .cloned()
        .map(PlacedEvent::full_width)
        .collect();

    // Sort by (start, end) ascending; ties broken by earlier end.
    placed.sort_by(|a, b| {
        (a.event.start, a.event.end).cmp(&(b.event.start, b.event.end))
    });

    match view {
        ViewMode::Day => layout_day(&mut placed),
        ViewMode::Week => layout_week(&mut placed),
    }

    placed
}

fn overlaps(a: &Event, b: &Event) -> bool {
    a.start < b.end && a.end > b.start
}

/// Whether one interval fully contains the other.
fn contains_either(a: &Event, b: &Event) -> bool {
    (a.start <= b.start && a.end >= b.end) || (b.start <= a.start && b.end >= a.end)
}

/// Greedy bin packing into at most six fixed columns. An event lands in
/// the first column where it overlaps nothing; failing that, in the
/// column with the fewest live overlaps, flagged as a forced collision.
fn layout_day(placed: &mut [PlacedEvent]) {
    let mut columns: Vec<Vec<Event>> = vec![Vec::new(); MAX_DAY_COLUMNS];

    for entry in placed.iter_mut() {
        let mut best_column = 0;
        let mut min_overlaps = usize::MAX;
        let mut assigned = None;

        for (col, occupants) in columns.iter().enumerate() {
            let overlapping = occupants
                .iter()
                .filter(|existing| overlaps(&entry.event, existing))
                .count();

            if overlapping == 0 {
                assigned = Some(col);
                break;
            }
            if overlapping < min_overlaps {
                min_overlaps = overlapping;
                best_column = col;
            }
        }

        match assigned {
            Some(col) => {
                columns[col].push(entry.event.clone());
                entry.column = col;
            }
            None => {
                columns[best_column].push(entry.event.clone());
                entry.column = best_column;
                entry.is_overlapping = true;
            }
        }
    }

    let used: std::collections::HashSet<usize> = placed.iter().map(|p| p.column).collect();
    let total = used.len().clamp(1, MAX_DAY_COLUMNS);
    for entry in placed.iter_mut() {
        entry.total_columns = total;
    }
}

/// Containment-pair grouping, capped at two columns. Plain overlaps
/// without containment keep full width and only get flagged.
fn layout_week(placed: &mut [PlacedEvent]) {
    let len = placed.len();
    let mut processed = vec![false; len];

    for i in 0..len {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let mut group = vec![i];

        for j in (i + 1)..len {
            if processed[j] {
                continue;
            }
            if overlaps(&placed[i].event, &placed[j].event)
                && contains_either(&placed[i].event, &placed[j].event)
            {
                group.push(j);
                processed[j] = true;
                if group.len() >= MAX_WEEK_COLUMNS {
                    break;
                }
            }
        }

        if group.len() > 1 {
            group.sort_by(|&a, &b| {
                (placed[a].event.start, placed[a].event.end)
                    .cmp(&(placed[b].event.start, placed[b].event.end))
            });
            let total = group.len().min(MAX_WEEK_COLUMNS);
            for (index, &member) in group.iter().enumerate() {
                placed[member].column = index;
                placed[member].total_columns = total;
            }
        }
    }

    // Full-width events that overlap a differently-grouped event without
    // containment get flagged on both sides, widths untouched.
    for i in 0..len {
        if placed[i].total_columns != 1 {
            continue;
        }
        for j in 0..len {
            if i == j {
                continue;
            }
            if overlaps(&placed[i].event, &placed[j].event)
                && !contains_either(&placed[i].event, &placed[j].event)
            {
                placed[i].is_overlapping = true;
                placed[j].is_overlapping = true;
            }
        }
    }
}
