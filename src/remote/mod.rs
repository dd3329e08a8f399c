//! Remote store and connectivity seams.
//!
//! The engine mirrors three kinds of documents to a remote real-time
//! store, addressed the way viewers read them:
//!
//! ```text
//! locations/{shareCode}             -> LocationDocument (encrypted payload)
//! journeys/{journeyId}              -> JourneySummary
//! journeys/{journeyId}/events/{id}  -> TransitionEvent
//! ```
//!
//! All remote operations are best-effort from the engine's point of view:
//! failures are transient ([`RemoteError`]), bounded by the delivery
//! queue's retry policy, and never block a caller indefinitely.

pub mod error;
pub mod types;

pub use error::{RemoteError, Result};
pub use types::{JourneySummary, LocationDocument};

use async_trait::async_trait;

use crate::journal::TransitionEvent;

/// Writer side of the remote real-time store.
///
/// Implemented by the platform adapter over the hosted document/KV
/// service. Each call is a single document write.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Writes the encrypted location document at `locations/{share_code}`.
    ///
    /// # Errors
    ///
    /// Returns a transient [`RemoteError`] on failure; the caller decides
    /// whether to retry.
    async fn put_location(&self, share_code: &str, doc: &LocationDocument) -> Result<()>;

    /// Writes the journey summary at `journeys/{journey_id}`.
    ///
    /// # Errors
    ///
    /// Returns a transient [`RemoteError`] on failure.
    async fn put_journey(&self, journey_id: &str, summary: &JourneySummary) -> Result<()>;

    /// Writes an event at `journeys/{journey_id}/events/{event.id}`.
    ///
    /// # Errors
    ///
    /// Returns a transient [`RemoteError`] on failure.
    async fn put_event(&self, journey_id: &str, event: &TransitionEvent) -> Result<()>;
}

/// Current network reachability, as reported by the OS.
///
/// The delivery queue consults this before flushing; callbacks from the
/// OS connectivity monitor drive re-flushes on reconnect.
pub trait Connectivity: Send + Sync {
    /// Whether the device currently has network connectivity.
    fn is_connected(&self) -> bool;
}
