//! Error types for local storage.

use thiserror::Error;

/// Error type for key-value store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from `SQLite`.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store mutex was poisoned or could not be acquired.
    #[error("storage lock error: {0}")]
    Lock(String),

    /// A stored value failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
