//! Core entity types: resources, bookings, recurrence rules, exceptions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::types::{BookingId, ExceptionId, ResourceId};

/// An opaque bookable entity. Provisioned out-of-band; the core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
}

/// A per-date override on a recurring booking.
///
/// `replace` is `None` for a skip (the occurrence on `except_date` is
/// dropped) and `Some((start, end))` for a replacement (the occurrence is
/// rewritten to that interval, which may fall on a different date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exception {
    pub id: ExceptionId,
    pub except_date: NaiveDate,
    pub replace: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Exception {
    pub fn skip(except_date: NaiveDate) -> Self {
        Self {
            id: ExceptionId::new(),
            except_date,
            replace: None,
        }
    }

    pub fn replace(except_date: NaiveDate, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: ExceptionId::new(),
            except_date,
            replace: Some((start, end)),
        }
    }
}

/// The recurrence rule attached one-to-one to a recurring booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub rrule: String,
    /// True iff the RRULE carries neither COUNT nor UNTIL.
    pub is_infinite: bool,
}

impl RecurrenceRule {
    pub fn new(rrule: impl Into<String>) -> Self {
        let rrule = rrule.into();
        let is_infinite = !(rrule.contains("COUNT=") || rrule.contains("UNTIL="));
        Self { rrule, is_infinite }
    }
}

/// A reservation of a resource over `[start, end)`. Single (no recurrence) or
/// recurring (exactly one rule, zero or more exceptions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub resource_id: ResourceId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub recurrence: Option<RecurrenceRule>,
    pub exceptions: Vec<Exception>,
}

impl Booking {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn template_duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}
