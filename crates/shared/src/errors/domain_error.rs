use thiserror::Error;

/// Domain-level errors representing business-rule violations.
///
/// `Conflict` is deliberately absent here: a detected double-booking is a
/// success-typed outcome of the writer (see `domain::booking::CreateOutcome`),
/// never an exception raised inside the core.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("invalid recurrence rule: {0}")]
    InvalidRecurrence(String),
}
