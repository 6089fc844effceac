//! Recurrence expansion (C2): RRULE + base interval + window + exceptions
//! into a finite, ordered list of occurrences.

use crate::model::Exception;
use chrono::{DateTime, Duration, Utc};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};
use shared::types::TimeSlot;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecurrenceError {
    #[error("RRULE does not parse: {0}")]
    Parse(String),
    #[error("RRULE failed validation against its DTSTART: {0}")]
    Invalid(String),
}

/// Expand `rrule_text` over `[window_start, window_end]` (both inclusive, per
/// the source algorithm), binding DTSTART to `base_start` when the text
/// doesn't carry its own, applying `exceptions` per-occurrence, and returning
/// intervals of the template duration `base_end - base_start`.
///
/// Duplicate exceptions on the same UTC date: last write in `exceptions`
/// wins (the caller's ordering is preserved into the lookup map).
pub fn expand(
    rrule_text: &str,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    base_start: DateTime<Utc>,
    base_end: DateTime<Utc>,
    exceptions: &[Exception],
) -> Result<Vec<TimeSlot>, RecurrenceError> {
    let duration = base_end - base_start;
    let dtstart = base_start.with_timezone(&Tz::UTC);

    let unvalidated: RRule<Unvalidated> = rrule_text
        .parse()
        .map_err(|e: rrule::RRuleError| RecurrenceError::Parse(e.to_string()))?;
    let validated = unvalidated
        .validate(dtstart)
        .map_err(|e| RecurrenceError::Invalid(e.to_string()))?;

    let result = RRuleSet::new(dtstart)
        .rrule(validated)
        .after(window_start.with_timezone(&Tz::UTC))
        .before(window_end.with_timezone(&Tz::UTC))
        .all(10_000);

    let mut by_date: HashMap<chrono::NaiveDate, &Exception> = HashMap::new();
    for exception in exceptions {
        by_date.insert(exception.except_date, exception);
    }

    let mut out = Vec::with_capacity(result.dates.len());
    for occurrence in result.dates {
        let start = occurrence.with_timezone(&Utc);
        let date = start.date_naive();

        match by_date.get(&date) {
            Some(Exception { replace: Some((s, e)), .. }) => {
                if let Ok(slot) = TimeSlot::new(*s, *e) {
                    out.push(slot);
                }
            }
            Some(Exception { replace: None, .. }) => {
                // skipped
            }
            None => {
                if let Ok(slot) = TimeSlot::new(start, start + duration) {
                    out.push(slot);
                }
            }
        }
    }

    Ok(out)
}

/// Parse and validate an RRULE against its DTSTART without expanding it —
/// used at write time to fail fast with `InvalidRecurrence` before any store
/// work happens.
pub fn validate(rrule_text: &str, dtstart: DateTime<Utc>) -> Result<(), RecurrenceError> {
    let dtstart = dtstart.with_timezone(&Tz::UTC);
    let unvalidated: RRule<Unvalidated> = rrule_text
        .parse()
        .map_err(|e: rrule::RRuleError| RecurrenceError::Parse(e.to_string()))?;
    unvalidated
        .validate(dtstart)
        .map_err(|e| RecurrenceError::Invalid(e.to_string()))?;
    Ok(())
}

/// The expansion window the resolver must use when searching for occurrences
/// overlapping a query window `[query_start, query_end)`: shifted back by the
/// template duration so an occurrence starting before `query_start` but
/// ending inside it is still produced.
pub fn resolver_window(
    query_start: DateTime<Utc>,
    query_end: DateTime<Utc>,
    template_duration: Duration,
) -> (DateTime<Utc>, DateTime<Utc>) {
    (query_start - template_duration, query_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, 0).unwrap()
    }

    #[test]
    fn expands_weekly_recurrence_with_skip_exception() {
        let base_start = dt(2025, 11, 3, 10, 0);
        let base_end = dt(2025, 11, 3, 11, 0);
        let exceptions = vec![Exception::skip(chrono::NaiveDate::from_ymd_opt(2025, 11, 10).unwrap())];

        let slots = expand(
            "FREQ=WEEKLY;BYDAY=MO;COUNT=4",
            dt(2025, 11, 1, 0, 0),
            dt(2025, 11, 30, 0, 0),
            base_start,
            base_end,
            &exceptions,
        )
        .unwrap();

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].start.day(), 3);
        assert_eq!(slots[1].start.day(), 17);
        assert_eq!(slots[2].start.day(), 24);
    }

    #[test]
    fn expands_weekly_recurrence_with_replacement_exception() {
        let base_start = dt(2025, 11, 3, 10, 0);
        let base_end = dt(2025, 11, 3, 11, 0);
        let exceptions = vec![Exception::replace(
            chrono::NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
            dt(2025, 11, 10, 14, 0),
            dt(2025, 11, 10, 15, 0),
        )];

        let slots = expand(
            "FREQ=WEEKLY;BYDAY=MO;COUNT=4",
            dt(2025, 11, 1, 0, 0),
            dt(2025, 11, 30, 0, 0),
            base_start,
            base_end,
            &exceptions,
        )
        .unwrap();

        assert_eq!(slots.len(), 4);
        let replaced = slots.iter().find(|s| s.start.day() == 10).unwrap();
        assert_eq!(replaced.start.hour(), 14);
    }

    #[test]
    fn invalid_rrule_fails() {
        let result = expand(
            "INVALID",
            dt(2025, 1, 1, 0, 0),
            dt(2025, 2, 1, 0, 0),
            dt(2025, 1, 1, 10, 0),
            dt(2025, 1, 1, 11, 0),
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_exceptions_last_write_wins() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        let exceptions = vec![
            Exception::skip(date),
            Exception::replace(date, dt(2025, 11, 10, 14, 0), dt(2025, 11, 10, 15, 0)),
        ];

        let slots = expand(
            "FREQ=WEEKLY;BYDAY=MO;COUNT=4",
            dt(2025, 11, 1, 0, 0),
            dt(2025, 11, 30, 0, 0),
            dt(2025, 11, 3, 10, 0),
            dt(2025, 11, 3, 11, 0),
            &exceptions,
        )
        .unwrap();

        let replaced = slots.iter().find(|s| s.start.day() == 10).unwrap();
        assert_eq!(replaced.start.hour(), 14);
    }
}
