//! Error types for the delivery queue.

use thiserror::Error;

use crate::storage::StorageError;

/// Error type for queue operations.
///
/// Delivery failures are not errors at this level — they are outcomes
/// counted in [`FlushOutcome`](super::FlushOutcome) and bounded by the
/// retry policy. Only local persistence can fail a queue call.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Persisting or loading the queue failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;
