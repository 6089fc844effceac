use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration in minutes (slot lengths, search horizons, step sizes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct DurationMinutes(i64);

impl DurationMinutes {
    pub fn new(minutes: i64) -> Self {
        Self(minutes.max(0))
    }

    pub fn as_minutes(&self) -> i64 {
        self.0
    }

    pub fn as_chrono_duration(&self) -> Duration {
        Duration::minutes(self.0)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for DurationMinutes {
    fn from(minutes: i64) -> Self {
        Self::new(minutes)
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 60 {
            let hours = self.0 / 60;
            let mins = self.0 % 60;
            if mins == 0 {
                write!(f, "{}h", hours)
            } else {
                write!(f, "{}h {}m", hours, mins)
            }
        } else {
            write!(f, "{}m", self.0)
        }
    }
}

/// A half-open interval `[start, end)` of absolute instants (UTC).
///
/// This is the one interval representation shared by every component: single
/// bookings, expanded recurring occurrences, gaps, and suggestions are all a
/// `TimeSlot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    /// Create a new time slot, validating that end is strictly after start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeSlotError> {
        if end <= start {
            return Err(TimeSlotError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create a time slot from a start time and duration.
    pub fn from_start_and_duration(start: DateTime<Utc>, duration: DurationMinutes) -> Self {
        Self {
            start,
            end: start + duration.as_chrono_duration(),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_milliseconds() / 60_000
    }

    /// `a.start < b.end && b.start < a.end` — touching endpoints never overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TimeSlotError {
    #[error("end time ({end}) must be after start time ({start})")]
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_duration_minutes() {
        let d = DurationMinutes::new(90);
        assert_eq!(d.as_minutes(), 90);
        assert_eq!(d.to_string(), "1h 30m");

        let d2 = DurationMinutes::new(30);
        assert_eq!(d2.to_string(), "30m");

        let d3 = DurationMinutes::new(120);
        assert_eq!(d3.to_string(), "2h");
    }

    #[test]
    fn test_duration_negative_clamped() {
        let d = DurationMinutes::new(-10);
        assert_eq!(d.as_minutes(), 0);
    }

    #[test]
    fn test_time_slot_creation() {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap();
        let slot = TimeSlot::new(start, end).unwrap();
        assert_eq!(slot.duration_minutes(), 60);
    }

    #[test]
    fn test_time_slot_invalid() {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        assert!(TimeSlot::new(start, end).is_err());
    }

    #[test]
    fn test_time_slot_overlaps() {
        let slot1 = TimeSlot::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap(),
        )
        .unwrap();

        let slot2 = TimeSlot::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 15, 11, 30, 0).unwrap(),
        )
        .unwrap();

        let slot3 = TimeSlot::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        )
        .unwrap();

        assert!(slot1.overlaps(&slot2)); // Overlapping
        assert!(!slot1.overlaps(&slot3)); // Adjacent, not overlapping
    }
}
