//! Pixel-to-time mapping for the vertical time grid.
//!
//! The grid is 24 hours tall at 60px per hour (1px per minute). Standard
//! mode maps offset 0 to midnight of the day column's date. Night mode
//! maps offset 0 to noon, so a single column shows a noon-to-noon shift
//! window that crosses midnight into the next calendar date.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::constants::{MINUTES_INCREMENT, PIXELS_PER_HOUR};

/// Which time origin the grid uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridMode {
    /// Offset 0 is 00:00 of the column's date.
    #[default]
    Standard,
    /// Offset 0 is 12:00 of the column's date; the lower half of the
    /// column is 00:00-12:00 of the next date.
    Night,
}

/// Round an instant to the nearest 15-minute boundary, rounding down when
/// the remainder is below half the increment. Seconds are zeroed.
pub fn snap_to_grid(t: NaiveDateTime) -> NaiveDateTime {
    let minute = t.minute() as i64;
    let remainder = minute % MINUTES_INCREMENT;
    let mut total = t.hour() as i64 * 60 + minute;
    if remainder != 0 {
        if remainder * 2 < MINUTES_INCREMENT {
            total -= remainder;
        } else {
            total += MINUTES_INCREMENT - remainder;
        }
    }
    midnight(t.date()) + Duration::minutes(total)
}

/// Convert a vertical pixel offset within a day column to an instant.
///
/// `snap_to_hour` rounds down to the enclosing hour (single and double
/// click creation); otherwise minutes round to the nearest 15.
pub fn time_from_offset(y: f64, day: NaiveDate, snap_to_hour: bool, mode: GridMode) -> NaiveDateTime {
    match mode {
        GridMode::Standard => {
            if y <= 0.0 {
                return midnight(day);
            }
            let hours_from_top = y / PIXELS_PER_HOUR;
            let (hours, minutes) = split_hours(hours_from_top, 0, 23, snap_to_hour);
            midnight(day) + Duration::minutes(hours * 60 + minutes)
        }
        GridMode::Night => {
            let hours_from_top = (y / PIXELS_PER_HOUR).max(0.0);
            if hours_from_top < 12.0 {
                // Upper half: the column date's afternoon/evening.
                let (hours, minutes) = split_hours(hours_from_top, 0, 11, snap_to_hour);
                midnight(day) + Duration::minutes((12 + hours) * 60 + minutes)
            } else {
                // Lower half: 00:00-12:00 of the next calendar date.
                let adjusted = hours_from_top - 12.0;
                let (hours, minutes) = split_hours(adjusted, 0, 11, snap_to_hour);
                midnight(day + Duration::days(1)) + Duration::minutes(hours * 60 + minutes)
            }
        }
    }
}

/// Convert an instant to a vertical pixel offset within a day column,
/// clamped to the column's 24h window.
pub fn offset_from_time(t: NaiveDateTime, day: NaiveDate, mode: GridMode) -> f64 {
    let origin = match mode {
        GridMode::Standard => midnight(day),
        GridMode::Night => midnight(day) + Duration::hours(12),
    };
    let minutes = (t - origin).num_minutes().clamp(0, 24 * 60) as f64;
    minutes * PIXELS_PER_HOUR / 60.0
}

/// Resolve a horizontal pixel offset to an index into the visible day
/// array, clamped to its bounds.
pub fn day_index_from_x(x: f64, column_width: f64, num_days: usize) -> usize {
    if num_days == 0 || column_width <= 0.0 {
        return 0;
    }
    let index = (x / column_width).floor() as i64;
    index.clamp(0, num_days as i64 - 1) as usize
}

pub(crate) fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(0, 0, 0).unwrap()
}

/// Split fractional hours into a clamped whole-hour part and a snapped
/// minute part. Minutes may come out as 60 and roll into the next hour,
/// except in the final hour of the window, where they stop at the last
/// increment so the result stays inside the column.
fn split_hours(hours_from_top: f64, min_hour: i64, max_hour: i64, snap_to_hour: bool) -> (i64, i64) {
    let hours = (hours_from_top.floor() as i64).clamp(min_hour, max_hour);
    if snap_to_hour {
        return (hours, 0);
    }
    let minutes_decimal = (hours_from_top - hours_from_top.floor()) * 60.0;
    let mut minutes = (minutes_decimal / MINUTES_INCREMENT as f64).round() as i64 * MINUTES_INCREMENT;
    if hours == max_hour && minutes >= 60 {
        minutes = 60 - MINUTES_INCREMENT;
    }
    (hours, minutes)
}
