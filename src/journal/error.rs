//! Error types for the event journal.

use thiserror::Error;

use crate::geofence::GeofenceError;
use crate::storage::StorageError;

/// Error type for journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Persisting or loading the event log failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Committing the geofence state after an accepted event failed.
    #[error("geofence state error: {0}")]
    Geofence(#[from] GeofenceError),
}

/// Result type alias for journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_display() {
        let inner = StorageError::Lock("poisoned".to_string());
        let err = JournalError::Storage(inner);
        assert_eq!(err.to_string(), "storage error: storage lock error: poisoned");
    }
}
