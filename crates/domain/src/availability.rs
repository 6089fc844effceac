//! Availability & suggestions (C5): gap enumeration over a window, and
//! forward-scan search for the next K non-conflicting slots.

use crate::busy::BusyInstance;
use crate::interval;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::types::TimeSlot;

/// A free interval of at least the requested minimum duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl From<TimeSlot> for AvailableSlot {
    fn from(slot: TimeSlot) -> Self {
        Self {
            start: slot.start,
            end: slot.end,
            duration_minutes: slot.duration_minutes(),
        }
    }
}

/// `availability(R, [from, to), minSlotMinutes)`: merge the busy set and
/// return the gaps within the window that meet the minimum duration.
pub fn availability(
    busy: &[BusyInstance],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    min_slot_minutes: i64,
) -> Vec<AvailableSlot> {
    let slots: Vec<TimeSlot> = busy
        .iter()
        .filter_map(|b| TimeSlot::new(b.start, b.end).ok())
        .collect();
    let merged = interval::merge(slots);
    interval::gaps(&merged, from, to, min_slot_minutes)
        .into_iter()
        .map(AvailableSlot::from)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextAvailableResult {
    pub suggestions: Vec<AvailableSlot>,
    pub searched_until: DateTime<Utc>,
}

/// Forward-scan for up to `max_suggestions` candidate slots of
/// `duration_minutes`, starting at `desired_start` and bounded by
/// `desired_start + horizon_hours`. On collision the cursor jumps past the
/// obstruction (`cursor = obstruction.end`); otherwise it advances by
/// `step_minutes`.
pub fn next_available(
    busy: &[BusyInstance],
    desired_start: DateTime<Utc>,
    duration_minutes: i64,
    horizon_hours: i64,
    step_minutes: i64,
    max_suggestions: usize,
) -> NextAvailableResult {
    let search_end = desired_start + Duration::hours(horizon_hours);
    let slots: Vec<TimeSlot> = busy
        .iter()
        .filter(|b| b.start < search_end && b.end > desired_start)
        .filter_map(|b| TimeSlot::new(b.start, b.end).ok())
        .collect();
    let merged = interval::merge(slots);

    let mut suggestions = Vec::with_capacity(max_suggestions);
    let mut cursor = desired_start;
    let duration = Duration::minutes(duration_minutes);
    let step = Duration::minutes(step_minutes);

    while cursor < search_end && suggestions.len() < max_suggestions {
        let candidate_end = cursor + duration;
        if let Some(obstruction) = merged
            .iter()
            .find(|m| cursor < m.end && m.start < candidate_end)
        {
            cursor = obstruction.end;
            continue;
        }

        if let Ok(slot) = TimeSlot::new(cursor, candidate_end) {
            suggestions.push(AvailableSlot::from(slot));
        }
        cursor += step;
    }

    NextAvailableResult {
        suggestions,
        searched_until: cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::types::BookingId;

    fn busy(h1: u32, m1: u32, h2: u32, m2: u32) -> BusyInstance {
        BusyInstance {
            booking_id: BookingId::new(),
            start: Utc.with_ymd_and_hms(2026, 1, 1, h1, m1, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 1, 1, h2, m2, 0).unwrap(),
            is_recurring: false,
        }
    }

    #[test]
    fn empty_window_yields_whole_range() {
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let slots = availability(&[], from, to, 60);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].duration_minutes, 1440);
    }

    #[test]
    fn min_slot_filters_short_gap() {
        let busy_set = vec![busy(10, 0, 10, 30), busy(10, 45, 11, 0)];
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let slots = availability(&busy_set, from, to, 60);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start.time(), chrono::NaiveTime::from_hms_opt(11, 0, 0).unwrap());
    }

    #[test]
    fn next_available_skips_past_obstruction() {
        let busy_set = vec![busy(10, 0, 11, 0)];
        let desired = Utc.with_ymd_and_hms(2026, 1, 1, 10, 30, 0).unwrap();
        let result = next_available(&busy_set, desired, 30, 24, 15, 3);
        assert_eq!(result.suggestions[0].start, busy_set[0].end);
    }

    #[test]
    fn next_available_steps_by_step_minutes_when_free() {
        let desired = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let result = next_available(&[], desired, 30, 24, 15, 3);
        assert_eq!(result.suggestions.len(), 3);
        assert_eq!(
            result.suggestions[1].start - result.suggestions[0].start,
            Duration::minutes(15)
        );
    }

    #[test]
    fn suggestions_never_overlap_busy_set() {
        let busy_set = vec![busy(10, 0, 11, 0), busy(11, 30, 12, 0)];
        let desired = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let result = next_available(&busy_set, desired, 20, 24, 15, 5);
        for suggestion in &result.suggestions {
            let slot = TimeSlot::new(suggestion.start, suggestion.end).unwrap();
            for b in &busy_set {
                let b_slot = TimeSlot::new(b.start, b.end).unwrap();
                assert!(!slot.overlaps(&b_slot));
            }
        }
    }
}
