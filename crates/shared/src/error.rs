//! Application-wide error envelope.
//!
//! Domain errors (`ShiftError`, `StockError`) carry their own codes; the API
//! converts them into an `AppError` before rendering a response.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or invalid input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation with a domain error code.
    #[error("Business rule violation: {message}")]
    BusinessRule {
        /// Stable machine-readable code (e.g. `INSUFFICIENT_STOCK`).
        code: &'static str,
        /// Human readable description.
        message: String,
    },

    /// State conflict (illegal transition, duplicate, lost race, locked month).
    #[error("Conflict: {message}")]
    Conflict {
        /// Stable machine-readable code (e.g. `MONTH_LOCKED`).
        code: &'static str,
        /// Human readable description.
        message: String,
    },

    /// Storage layer failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an error from a domain status/code pair.
    ///
    /// Any other status is treated as an infrastructure fault.
    #[must_use]
    pub fn from_domain(status: u16, code: &'static str, message: String) -> Self {
        match status {
            404 => Self::NotFound(message),
            400 => Self::Validation(message),
            409 => Self::Conflict { code, message },
            422 => Self::BusinessRule { code, message },
            _ => Self::Storage(message),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule { .. } => 422,
            Self::Conflict { .. } => 409,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule { code, .. } | Self::Conflict { code, .. } => *code,
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
