//! Busy-set resolver (C3): combine single bookings and expanded recurring
//! occurrences into the sorted busy set for a (resource, window) pair.
//!
//! Store I/O (the two queries named in the source algorithm) lives in the
//! `db` crate; this module is the pure, store-independent half: given
//! pre-fetched rows, produce the merged, filtered, sorted result.

use crate::model::{Exception, RecurrenceRule};
use crate::recurrence::{self, RecurrenceError};
use chrono::{DateTime, Utc};
use shared::types::BookingId;

/// A materialized occupied interval on a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyInstance {
    pub booking_id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_recurring: bool,
}

/// A recurring booking as read from the store: just enough to re-run C2.
pub struct RecurringSource {
    pub booking_id: BookingId,
    pub base_start: DateTime<Utc>,
    pub base_end: DateTime<Utc>,
    pub rule: RecurrenceRule,
    pub exceptions: Vec<Exception>,
}

/// Combine pre-fetched single bookings and recurring sources into the sorted
/// busy set for `[window_start, window_end)`. Single bookings are assumed to
/// already intersect the window (the caller's store query filtered them);
/// recurring sources are expanded here and filtered to occurrences that
/// strictly overlap the window.
///
/// An unparseable persisted RRULE is logged and skipped (never aborts the
/// whole resolution), matching the read-time failure semantics for recurrence
/// expansion.
pub fn resolve(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    single_bookings: &[(BookingId, DateTime<Utc>, DateTime<Utc>)],
    recurring: &[RecurringSource],
) -> Vec<BusyInstance> {
    let mut out: Vec<BusyInstance> = single_bookings
        .iter()
        .map(|(id, start, end)| BusyInstance {
            booking_id: *id,
            start: *start,
            end: *end,
            is_recurring: false,
        })
        .collect();

    for source in recurring {
        let duration = source.base_end - source.base_start;
        let (expand_start, expand_end) =
            recurrence::resolver_window(window_start, window_end, duration);

        match recurrence::expand(
            &source.rule.rrule,
            expand_start,
            expand_end,
            source.base_start,
            source.base_end,
            &source.exceptions,
        ) {
            Ok(occurrences) => {
                for slot in occurrences {
                    if slot.start < window_end && slot.end > window_start {
                        out.push(BusyInstance {
                            booking_id: source.booking_id,
                            start: slot.start,
                            end: slot.end,
                            is_recurring: true,
                        });
                    }
                }
            }
            Err(RecurrenceError::Parse(msg)) | Err(RecurrenceError::Invalid(msg)) => {
                tracing::warn!(
                    booking_id = %source.booking_id,
                    rrule = %source.rule.rrule,
                    error = %msg,
                    "skipping recurring booking with unparseable RRULE"
                );
            }
        }
    }

    out.sort_by_key(|b| b.start);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecurrenceRule;
    use chrono::TimeZone;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn combines_single_and_recurring_sorted_by_start() {
        let single_id = BookingId::new();
        let recurring_id = BookingId::new();

        let single = vec![(single_id, dt(2025, 11, 20, 9), dt(2025, 11, 20, 10))];
        let recurring = vec![RecurringSource {
            booking_id: recurring_id,
            base_start: dt(2025, 11, 3, 10),
            base_end: dt(2025, 11, 3, 11),
            rule: RecurrenceRule::new("FREQ=WEEKLY;BYDAY=MO;COUNT=4"),
            exceptions: vec![],
        }];

        let busy = resolve(dt(2025, 11, 1, 0), dt(2025, 11, 30, 0), &single, &recurring);

        assert_eq!(busy.len(), 5); // 4 weekly occurrences + 1 single
        assert!(busy.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn skips_unparseable_persisted_rrule_without_aborting() {
        let ok_id = BookingId::new();
        let bad_id = BookingId::new();
        let recurring = vec![
            RecurringSource {
                booking_id: ok_id,
                base_start: dt(2025, 11, 3, 10),
                base_end: dt(2025, 11, 3, 11),
                rule: RecurrenceRule::new("FREQ=WEEKLY;BYDAY=MO;COUNT=2"),
                exceptions: vec![],
            },
            RecurringSource {
                booking_id: bad_id,
                base_start: dt(2025, 11, 3, 10),
                base_end: dt(2025, 11, 3, 11),
                rule: RecurrenceRule::new("GARBAGE"),
                exceptions: vec![],
            },
        ];

        let busy = resolve(dt(2025, 11, 1, 0), dt(2025, 11, 30, 0), &[], &recurring);
        assert_eq!(busy.len(), 2);
        assert!(busy.iter().all(|b| b.booking_id == ok_id));
    }
}
