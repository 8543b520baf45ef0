//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the request.
    #[error("request rejected by store: {0}")]
    Rejected(String),

    /// A blocking task failed to complete.
    #[error("background task failed: {0}")]
    Task(String),

    /// Opaque failure from a foreign backend implementation.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
