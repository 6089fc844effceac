use super::DomainError;
use thiserror::Error;

/// Application-level errors (includes infrastructure, wraps `DomainError`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Domain(e) => match e {
                DomainError::Validation { .. } => 400,
                DomainError::ResourceNotFound(_) => 404,
                DomainError::InvalidRecurrence(_) => 400,
            },
            AppError::Storage(_) | AppError::Internal(_) => 500,
            AppError::Cancelled => 499,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Domain(e) => match e {
                DomainError::Validation { .. } => "VALIDATION_ERROR",
                DomainError::ResourceNotFound(_) => "RESOURCE_NOT_FOUND",
                DomainError::InvalidRecurrence(_) => "INVALID_RECURRENCE",
            },
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Cancelled => "CANCELLED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "storage error");
        AppError::Storage(err.to_string())
    }
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
