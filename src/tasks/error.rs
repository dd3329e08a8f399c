//! Error types for background services.

use thiserror::Error;

/// Errors from OS region monitoring.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The OS rejected the geofence registration.
    #[error("region registration failed: {0}")]
    Registration(String),

    /// Background location permission is missing.
    #[error("background monitoring permission denied")]
    PermissionDenied,
}

/// Result type alias for monitoring operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
