// src/domain/mod.rs
//
// Domain Root - the single source of truth for the domain API.
// All other modules import from `crate::domain::*`

pub mod wish;

pub use wish::{title_error, validate_wish, Wish, TITLE_MAX_CHARS, UNSAVED_WISH_ID};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of the input rules for a wish
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    /// Message without the error-kind prefix, suitable for a notice
    pub fn message(&self) -> &str {
        match self {
            DomainError::InvariantViolation(message) => message,
        }
    }
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
