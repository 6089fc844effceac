//! Conflict checker (C4, pure half): given a candidate interval (or set of
//! expanded recurring occurrences) and the existing busy set, decide whether
//! a write may proceed and, if not, build the structured conflict response.
//!
//! The transactional write itself (storage exclusion insert, advisory lock,
//! commit/rollback) lives in the `db` crate — this module only ever answers
//! "does this candidate collide, and with what".

use crate::busy::BusyInstance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{BookingId, TimeSlot};

/// One conflicting busy instance returned alongside a 409.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictEntry {
    pub booking_id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_recurring: bool,
    /// Present only when the *candidate* (not the existing booking) was
    /// itself a recurring occurrence: identifies which instance clashed.
    pub occurrence_start: Option<DateTime<Utc>>,
    pub occurrence_end: Option<DateTime<Utc>>,
}

/// Find every busy instance that overlaps `candidate`.
pub fn find_conflicts(candidate: &TimeSlot, busy: &[BusyInstance]) -> Vec<ConflictEntry> {
    busy.iter()
        .filter(|b| candidate.start < b.end && b.start < candidate.end)
        .map(|b| ConflictEntry {
            booking_id: b.booking_id,
            start: b.start,
            end: b.end,
            is_recurring: b.is_recurring,
            occurrence_start: None,
            occurrence_end: None,
        })
        .collect()
}

/// Check every occurrence of a candidate recurring booking against the busy
/// set, tagging each conflict with the clashing occurrence. Does not
/// short-circuit on the first conflict: every occurrence is checked so the
/// caller can report the full set.
pub fn find_conflicts_for_occurrences(
    occurrences: &[TimeSlot],
    busy: &[BusyInstance],
) -> Vec<ConflictEntry> {
    let mut out = Vec::new();
    for occurrence in occurrences {
        for b in busy {
            if occurrence.start < b.end && b.start < occurrence.end {
                out.push(ConflictEntry {
                    booking_id: b.booking_id,
                    start: b.start,
                    end: b.end,
                    is_recurring: b.is_recurring,
                    occurrence_start: Some(occurrence.start),
                    occurrence_end: Some(occurrence.end),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(h1: u32, h2: u32) -> TimeSlot {
        TimeSlot::new(
            Utc.with_ymd_and_hms(2025, 12, 2, h1, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 2, h2, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn adjacent_booking_is_not_a_conflict() {
        let existing = BusyInstance {
            booking_id: BookingId::new(),
            start: slot(10, 11).start,
            end: slot(10, 11).end,
            is_recurring: false,
        };
        let candidate = slot(11, 12);
        assert!(find_conflicts(&candidate, &[existing]).is_empty());
    }

    #[test]
    fn overlapping_booking_is_a_conflict() {
        let existing = BusyInstance {
            booking_id: BookingId::new(),
            start: slot(10, 11).start,
            end: slot(10, 11).end,
            is_recurring: false,
        };
        let candidate = TimeSlot::new(
            Utc.with_ymd_and_hms(2025, 12, 2, 10, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 2, 11, 30, 0).unwrap(),
        )
        .unwrap();
        let conflicts = find_conflicts(&candidate, &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].start, slot(10, 11).start);
    }
}
