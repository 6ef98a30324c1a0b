//! Time types for free/busy queries.
//!
//! [`TimeWindow`] defines the half-open `[start, end)` UTC range a query
//! covers; [`FreeBusySlot`] is one occupied interval inside such a range.
//! Both work exclusively in absolute instants, never provider-local wall
//! clock, so no time-zone ambiguity leaks downstream.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A time window for querying calendars.
///
/// Represents a half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a time window from a start time and duration.
    pub fn from_duration(start: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(start, start + duration)
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    ///
    /// Uses half-open interval semantics: `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Checks if the interval `[start, end)` overlaps this window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// One occupied interval `[start, end)` on a calendar.
///
/// Opaque by design: the booking logic above this layer infers availability
/// by subtracting these from candidate slots, so no event content is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBusySlot {
    /// Start of the busy interval (inclusive), UTC.
    pub start: DateTime<Utc>,
    /// End of the busy interval (exclusive), UTC.
    pub end: DateTime<Utc>,
}

impl FreeBusySlot {
    /// Creates a new busy slot.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Clips this slot to the given query window.
    ///
    /// Returns `None` if the slot does not overlap the window or degenerates
    /// to an empty interval after clipping, so every returned slot satisfies
    /// `start < end` and lies inside the window.
    pub fn clip_to(&self, window: &TimeWindow) -> Option<FreeBusySlot> {
        if !window.overlaps(self.start, self.end) {
            return None;
        }
        let start = self.start.max(window.start);
        let end = self.end.min(window.end);
        if start < end { Some(Self { start, end }) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn window_creation() {
        let window = TimeWindow::new(utc(2026, 2, 5, 9, 0, 0), utc(2026, 2, 5, 17, 0, 0));
        assert_eq!(window.duration(), Duration::hours(8));
    }

    #[test]
    #[should_panic(expected = "start must be <= end")]
    fn invalid_window() {
        TimeWindow::new(utc(2026, 2, 5, 17, 0, 0), utc(2026, 2, 5, 9, 0, 0));
    }

    #[test]
    fn window_contains_half_open() {
        let window = TimeWindow::new(utc(2026, 2, 5, 9, 0, 0), utc(2026, 2, 5, 17, 0, 0));
        assert!(window.contains(utc(2026, 2, 5, 9, 0, 0))); // start inclusive
        assert!(window.contains(utc(2026, 2, 5, 16, 59, 59)));
        assert!(!window.contains(utc(2026, 2, 5, 17, 0, 0))); // end exclusive
        assert!(!window.contains(utc(2026, 2, 5, 8, 59, 59)));
    }

    #[test]
    fn window_overlaps() {
        let window = TimeWindow::new(utc(2026, 2, 5, 9, 0, 0), utc(2026, 2, 5, 17, 0, 0));
        assert!(window.overlaps(utc(2026, 2, 5, 8, 0, 0), utc(2026, 2, 5, 10, 0, 0)));
        assert!(window.overlaps(utc(2026, 2, 5, 16, 0, 0), utc(2026, 2, 5, 18, 0, 0)));
        // Touching at the boundary is not an overlap.
        assert!(!window.overlaps(utc(2026, 2, 5, 8, 0, 0), utc(2026, 2, 5, 9, 0, 0)));
        assert!(!window.overlaps(utc(2026, 2, 5, 17, 0, 0), utc(2026, 2, 5, 18, 0, 0)));
    }

    #[test]
    fn slot_inside_window_unchanged() {
        let window = TimeWindow::new(utc(2026, 2, 5, 9, 0, 0), utc(2026, 2, 5, 17, 0, 0));
        let slot = FreeBusySlot::new(utc(2026, 2, 5, 10, 0, 0), utc(2026, 2, 5, 11, 0, 0));
        assert_eq!(slot.clip_to(&window), Some(slot));
    }

    #[test]
    fn slot_straddling_boundary_is_clipped() {
        let window = TimeWindow::new(utc(2026, 2, 5, 9, 0, 0), utc(2026, 2, 5, 17, 0, 0));
        let slot = FreeBusySlot::new(utc(2026, 2, 5, 8, 0, 0), utc(2026, 2, 5, 10, 0, 0));
        let clipped = slot.clip_to(&window).unwrap();
        assert_eq!(clipped.start, window.start);
        assert_eq!(clipped.end, utc(2026, 2, 5, 10, 0, 0));
        assert!(clipped.start < clipped.end);
    }

    #[test]
    fn slot_outside_window_is_dropped() {
        let window = TimeWindow::new(utc(2026, 2, 5, 9, 0, 0), utc(2026, 2, 5, 17, 0, 0));
        let before = FreeBusySlot::new(utc(2026, 2, 5, 7, 0, 0), utc(2026, 2, 5, 8, 0, 0));
        let touching = FreeBusySlot::new(utc(2026, 2, 5, 8, 0, 0), utc(2026, 2, 5, 9, 0, 0));
        assert_eq!(before.clip_to(&window), None);
        assert_eq!(touching.clip_to(&window), None);
    }

    #[test]
    fn serde_roundtrip() {
        let window = TimeWindow::new(utc(2026, 2, 5, 9, 0, 0), utc(2026, 2, 5, 17, 0, 0));
        let json = serde_json::to_string(&window).unwrap();
        let parsed: TimeWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(window, parsed);
    }
}
