// src/error/types.rs
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Task(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// The mutating repository operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishOperation {
    Add,
    Update,
    Delete,
}

impl WishOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            WishOperation::Add => "add",
            WishOperation::Update => "update",
            WishOperation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for WishOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single failure kind surfaced by the repository boundary.
/// Wraps whatever the store reported for the named operation.
#[derive(Debug, Error)]
#[error("Failed to {operation} wish")]
pub struct RepositoryFailure {
    pub operation: WishOperation,
    #[source]
    pub cause: AppError,
}

impl RepositoryFailure {
    pub fn new(operation: WishOperation, cause: AppError) -> Self {
        Self { operation, cause }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_repository_failure_names_operation() {
        let failure = RepositoryFailure::new(
            WishOperation::Update,
            AppError::Other("disk full".to_string()),
        );
        assert_eq!(failure.to_string(), "Failed to update wish");
        assert_eq!(
            failure.source().map(|e| e.to_string()),
            Some("Other error: disk full".to_string())
        );
    }

    #[test]
    fn test_app_error_serializes_as_message() {
        let json = serde_json::to_string(&AppError::Pool("timed out".to_string())).unwrap();
        assert_eq!(json, "\"Pool error: timed out\"");
    }

    #[test]
    fn test_operation_serialization() {
        assert_eq!(serde_json::to_string(&WishOperation::Delete).unwrap(), "\"delete\"");
    }
}
