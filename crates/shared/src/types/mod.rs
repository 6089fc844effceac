mod ids;
mod time;

pub use ids::{BookingId, ExceptionId, ResourceId};
pub use time::{DurationMinutes, TimeSlot, TimeSlotError};
