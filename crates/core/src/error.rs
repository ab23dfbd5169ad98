//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the compute engines
/// (rejected input, violated preconditions). Rendering and IO concerns belong
/// to the reporting layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A quantity, rate or amount was negative, non-finite or overflowed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Input that was expected to be chronological was not.
    ///
    /// `index` is the position of the first record dated before its predecessor.
    #[error("ordering violation: record {index} is dated before its predecessor")]
    OrderingViolation { index: usize },

    /// A value failed validation (e.g. malformed identifier or keyword).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn ordering(index: usize) -> Self {
        Self::OrderingViolation { index }
    }
}
