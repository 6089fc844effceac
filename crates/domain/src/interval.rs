//! Half-open interval primitives: overlap, merge, gap computation.

use shared::types::TimeSlot;

/// Sort by start and left-fold, coalescing when `current.start <= last.end`.
///
/// Note the `<=`, not `<`: touching intervals are merged for gap-computation
/// purposes even though they don't "overlap" under [`TimeSlot::overlaps`].
pub fn merge(mut slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
    if slots.is_empty() {
        return slots;
    }
    slots.sort_by_key(|s| s.start);

    let mut merged: Vec<TimeSlot> = Vec::with_capacity(slots.len());
    for slot in slots {
        match merged.last_mut() {
            Some(last) if slot.start <= last.end => {
                if slot.end > last.end {
                    last.end = slot.end;
                }
            }
            _ => merged.push(slot),
        }
    }
    merged
}

/// Gaps within `[window_start, window_end)` that are disjoint from `merged`
/// and at least `min_duration_minutes` long. `merged` must already be sorted
/// and disjoint (the output of [`merge`]).
pub fn gaps(
    merged: &[TimeSlot],
    window_start: chrono::DateTime<chrono::Utc>,
    window_end: chrono::DateTime<chrono::Utc>,
    min_duration_minutes: i64,
) -> Vec<TimeSlot> {
    let mut out = Vec::new();
    let mut cursor = window_start;

    for slot in merged {
        if slot.start > cursor {
            push_gap(&mut out, cursor, slot.start, min_duration_minutes);
        }
        if slot.end > cursor {
            cursor = slot.end;
        }
    }
    if cursor < window_end {
        push_gap(&mut out, cursor, window_end, min_duration_minutes);
    }
    out
}

fn push_gap(
    out: &mut Vec<TimeSlot>,
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
    min_duration_minutes: i64,
) {
    if let Ok(slot) = TimeSlot::new(start, end) {
        if slot.duration_minutes() >= min_duration_minutes {
            out.push(slot);
        }
    }
}
