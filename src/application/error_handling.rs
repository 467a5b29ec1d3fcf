// src/application/error_handling.rs
//
// Error presentation for the view layer
//
// ARCHITECTURE:
// - Maps a failed write to a notice the view can show and dismiss
// - Never exposes internal implementation details in `message`
// - The storage cause goes to `details` for diagnostics

use serde::{Deserialize, Serialize};

use crate::error::{AppError, RepositoryFailure, WishOperation};

/// Error notice for the view layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: ErrorType,
    pub operation: WishOperation,
    pub message: String,
    pub details: String,
}

/// Error categories for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The database or its connection pool failed
    Database,

    /// Anything else (task panics, unexpected errors)
    Internal,
}

impl ErrorResponse {
    /// Notice for a failed repository write
    pub fn from_failure(failure: &RepositoryFailure) -> Self {
        let error_type = match &failure.cause {
            AppError::Database(_) | AppError::Pool(_) => ErrorType::Database,
            _ => ErrorType::Internal,
        };

        Self {
            error_type,
            operation: failure.operation,
            message: failure.to_string(),
            details: failure.cause.to_string(),
        }
    }
}
