//! Error types for geofence tracking.

use thiserror::Error;

use crate::storage::StorageError;

/// Error type for geofence tracker operations.
#[derive(Debug, Error)]
pub enum GeofenceError {
    /// Persisting or loading geofence state failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Referenced geofence does not exist.
    #[error("geofence not found: {0}")]
    NotFound(String),
}

/// Result type alias for geofence operations.
pub type Result<T> = std::result::Result<T, GeofenceError>;
