//! Category visibility filtering.
//!
//! An event's category is its accent color string. Persistence state can
//! override it: a confirmed-persisted event files under the validated
//! blue, an explicitly-unvalidated one under the grey.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{category_for, CategoryColor, UNVALIDATED_COLOR, VALIDATED_COLOR};
use crate::event::Event;

/// The category color an event filters (and renders) under.
pub fn effective_color(event: &Event) -> &str {
    match event.is_validated {
        Some(true) => VALIDATED_COLOR,
        Some(false) => UNVALIDATED_COLOR,
        None => &event.color,
    }
}

/// The full palette entry an event renders under, when its effective
/// color names a known category.
pub fn palette_for(event: &Event) -> Option<&'static CategoryColor> {
    category_for(effective_color(event))
}

/// The active category set. An empty set means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilter {
    active: HashSet<String>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        CategoryFilter::default()
    }

    pub fn with_active<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategoryFilter {
            active: colors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active(&self) -> &HashSet<String> {
        &self.active
    }

    /// Toggle one category in or out of the active set.
    pub fn toggle(&mut self, color: &str) {
        if !self.active.remove(color) {
            self.active.insert(color.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_visible(&self, event: &Event) -> bool {
        self.active.is_empty() || self.active.contains(effective_color(event))
    }

    /// The visible subset of a list, in input order.
    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|e| self.is_visible(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event_with_color(color: &str) -> Event {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let mut e = Event::new(
            "shiftalpha01",
            day.and_hms_opt(9, 0, 0).unwrap(),
            day.and_hms_opt(10, 0, 0).unwrap(),
        );
        e.color = color.to_string();
        e
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let filter = CategoryFilter::new();
        assert!(filter.is_visible(&event_with_color("#f54455")));
    }

    #[test]
    fn test_active_set_filters_by_color() {
        let filter = CategoryFilter::with_active(["#f54455"]);
        assert!(filter.is_visible(&event_with_color("#f54455")));
        assert!(!filter.is_visible(&event_with_color("#3b82f6")));
    }

    #[test]
    fn test_validated_event_files_under_blue() {
        let mut e = event_with_color("#f54455");
        e.is_validated = Some(true);
        assert_eq!(effective_color(&e), VALIDATED_COLOR);

        let filter = CategoryFilter::with_active([VALIDATED_COLOR]);
        assert!(filter.is_visible(&e));
        e.is_validated = None;
        assert!(!filter.is_visible(&e));
    }

    #[test]
    fn test_unvalidated_event_files_under_grey() {
        let mut e = event_with_color("#f54455");
        e.is_validated = Some(false);
        assert_eq!(effective_color(&e), UNVALIDATED_COLOR);
    }

    #[test]
    fn test_palette_follows_effective_color() {
        // A contract shift renders under the contract palette until it is
        // validated, then under the validated one.
        let mut e = event_with_color("#f54455");
        assert_eq!(palette_for(&e).map(|c| c.name), Some("Contract"));
        assert_eq!(palette_for(&e).map(|c| c.color1), Some("#ffbbcf"));
        e.is_validated = Some(true);
        assert_eq!(palette_for(&e).map(|c| c.name), Some("Validated"));
        // Colors outside the palette have no entry.
        assert!(palette_for(&event_with_color("#3b82f6")).is_none());
    }

    #[test]
    fn test_toggle_round_trips() {
        let mut filter = CategoryFilter::new();
        filter.toggle("#f54455");
        assert!(!filter.is_empty());
        filter.toggle("#f54455");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = CategoryFilter::with_active(["#f54455"]);
        let events = vec![
            event_with_color("#f54455"),
            event_with_color("#3b82f6"),
            event_with_color("#f54455"),
        ];
        let visible = filter.apply(&events);
        assert_eq!(visible.len(), 2);
    }
}
