use chrono::{DateTime, NaiveDate, Utc};
use domain::model::Exception;
use serde::{Deserialize, Serialize};
use shared::types::{BookingId, ExceptionId, ResourceId};

/// Row shape for `bookings`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub id: BookingId,
    pub resource_id: ResourceId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Row shape for `exceptions`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExceptionRow {
    pub id: ExceptionId,
    pub booking_id: BookingId,
    pub except_date: NaiveDate,
    pub replace_start: Option<DateTime<Utc>>,
    pub replace_end: Option<DateTime<Utc>>,
}

impl From<ExceptionRow> for Exception {
    fn from(row: ExceptionRow) -> Self {
        Exception {
            id: row.id,
            except_date: row.except_date,
            replace: match (row.replace_start, row.replace_end) {
                (Some(s), Some(e)) => Some((s, e)),
                _ => None,
            },
        }
    }
}

/// Row shape for the `bookings JOIN recurrence_rules` query that feeds the
/// busy-set resolver — kept as a single flat struct because sqlx's
/// `query_as` decodes one row into one `FromRow` impl, not a tuple of them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecurringBookingRow {
    pub id: BookingId,
    pub resource_id: ResourceId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub rrule: String,
    pub is_infinite: bool,
}

/// Input for a new exception, before it has an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewException {
    pub except_date: NaiveDate,
    pub replace_start: Option<DateTime<Utc>>,
    pub replace_end: Option<DateTime<Utc>>,
}
