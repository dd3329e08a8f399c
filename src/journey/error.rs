//! Error types for journey management.

use thiserror::Error;

use super::types::JourneyStatus;
use crate::geofence::GeofenceError;
use crate::journal::JournalError;
use crate::location::ProviderError;
use crate::queue::QueueError;
use crate::storage::StorageError;

/// Error type for journey operations.
#[derive(Debug, Error)]
pub enum JourneyError {
    /// Bad configuration (empty name/destination, sharing without
    /// credentials). Rejected before any state changes.
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced journey or waypoint does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Another journey is already active on this device.
    #[error("journey {0} is already active")]
    AlreadyActive(String),

    /// Location permission is missing; fatal to starting a journey.
    #[error("location permission denied")]
    PermissionDenied,

    /// No location fix could be obtained; fatal to starting a journey.
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    /// The requested lifecycle transition is not allowed.
    #[error("cannot {action} a {from:?} journey")]
    InvalidTransition {
        /// Current status.
        from: JourneyStatus,
        /// Attempted action.
        action: &'static str,
    },

    /// OS region monitoring could not be started.
    #[error("monitoring error: {0}")]
    Monitoring(String),

    /// Local persistence failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The event journal failed.
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),

    /// Geofence state tracking failed.
    #[error("geofence error: {0}")]
    Geofence(#[from] GeofenceError),

    /// The delivery queue failed locally.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

impl From<ProviderError> for JourneyError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::PermissionDenied => Self::PermissionDenied,
            ProviderError::Unavailable(reason) => Self::LocationUnavailable(reason),
        }
    }
}

/// Result type alias for journey operations.
pub type Result<T> = std::result::Result<T, JourneyError>;
