//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid day: {0} (expected 0-6 or a weekday name)")]
    InvalidDay(String),

    #[error("Day {0} selected more than once")]
    DuplicateDay(String),

    #[error("Unknown adapter: {0}. Valid: golden, backend, legacy")]
    UnknownAdapter(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

impl DomainError {
    /// Check if this error was caused by malformed selection input
    pub fn is_selection_error(&self) -> bool {
        matches!(self, DomainError::InvalidDay(_) | DomainError::DuplicateDay(_))
    }
}
