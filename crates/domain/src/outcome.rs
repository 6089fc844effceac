//! The success-typed result of a C4 write: either the created booking, or a
//! structured conflict. A conflict is never an exception inside the core —
//! it's a value the writer returns so the caller can render a 409 with
//! suggestions attached.

use crate::availability::AvailableSlot;
use crate::conflict::ConflictEntry;
use crate::model::Booking;

#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created(Booking),
    Conflict {
        conflicts: Vec<ConflictEntry>,
        next_available: Vec<AvailableSlot>,
    },
}
