pub mod availability;
pub mod busy;
pub mod conflict;
pub mod interval;
pub mod model;
pub mod outcome;
pub mod recurrence;

pub use availability::{next_available, AvailableSlot, NextAvailableResult};
pub use busy::{BusyInstance, RecurringSource};
pub use conflict::{find_conflicts, find_conflicts_for_occurrences, ConflictEntry};
pub use model::{Booking, Exception, RecurrenceRule, Resource};
pub use outcome::CreateOutcome;
pub use recurrence::{expand, validate, RecurrenceError};

/// Default validation/expansion horizon (days) for recurring-booking conflict
/// checks, overridable via `RECURRENCE_EXPANSION_DAYS`.
pub const DEFAULT_RECURRENCE_EXPANSION_DAYS: i64 = 90;
