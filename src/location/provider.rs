//! Seam for the OS location provider.

use async_trait::async_trait;
use thiserror::Error;

use super::types::LocationFix;

/// Errors surfaced by the OS location provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Foreground or background location permission is missing.
    #[error("location permission denied")]
    PermissionDenied,

    /// No fix could be obtained (hardware off, timeout, airplane mode).
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Source of fresh location fixes.
///
/// Implemented by the platform adapter around the OS location service.
/// The adapter is responsible for discarding fixes with accuracy worse
/// than 100 m before they reach the engine.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Obtains a fresh fix.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::PermissionDenied`] when permission is
    /// missing and [`ProviderError::Unavailable`] when no fix can be
    /// produced. Starting a journey fails on either.
    async fn current_fix(&self) -> Result<LocationFix, ProviderError>;
}
