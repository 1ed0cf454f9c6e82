//! Storage error types.
//!
//! `BackendUnavailable` is the only transient kind; the key-lookup kinds signal caller ordering
//! bugs (e.g. writing before registering) and must not be retried.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("Row not found: {0}")]
    RowNotFound(NaiveDate),
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Malformed data: {0}")]
    Malformed(String),
    #[error("Database error: {0}")]
    Database(String),
}

impl StorageError {
    /// True when the same call may succeed later without any change on the caller's side.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::BackendUnavailable(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StorageError::BackendUnavailable(e.to_string())
            }
            other => StorageError::Database(other.to_string()),
        }
    }
}
