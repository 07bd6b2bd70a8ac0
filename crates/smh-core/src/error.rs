//! # AppError
//!
//! Centralized error handling for the Study Materials Hub.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// Fields a create request must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 6] = ["title", "link", "type", "author", "semester", "subject"];

/// The primary error type for all smh-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// One or more required fields were absent or empty.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Material type outside {PDF, VIDEO}.
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Semester that is not an integer in 1..=8.
    #[error("invalid semester: {0}")]
    InvalidSemester(String),

    /// Any other rejected input (e.g. an unusable storage key)
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found (e.g., Material)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Infrastructure failure (e.g., DB down, unreadable file)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for errors caused by the caller's input rather than the system.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::MissingFields(_) | Self::InvalidType(_) | Self::InvalidSemester(_) | Self::Validation(_)
        )
    }

    pub fn not_found(kind: &str, id: impl ToString) -> Self {
        Self::NotFound(kind.to_string(), id.to_string())
    }
}

/// A specialized Result type for Study Materials Hub logic.
pub type Result<T> = std::result::Result<T, AppError>;
