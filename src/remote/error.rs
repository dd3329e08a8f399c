//! Error types for remote store operations.

use thiserror::Error;

/// Errors from the remote store. All variants are transient sync
/// failures: the delivery queue retries them up to its policy and then
/// drops the item with a logged warning.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never reached the store (offline, DNS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The store rejected the write.
    #[error("remote store rejected write to {path}: {reason}")]
    Rejected {
        /// Document path of the attempted write.
        path: String,
        /// The rejection reason.
        reason: String,
    },

    /// The operation timed out.
    #[error("remote operation timed out: {0}")]
    Timeout(String),
}

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_display() {
        let err = RemoteError::Network("connection reset".to_string());
        assert_eq!(err.to_string(), "network error: connection reset");
    }

    #[test]
    fn rejected_error_display() {
        let err = RemoteError::Rejected {
            path: "locations/abc".to_string(),
            reason: "permission".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "remote store rejected write to locations/abc: permission"
        );
    }

    #[test]
    fn timeout_error_display() {
        let err = RemoteError::Timeout("put_event".to_string());
        assert_eq!(err.to_string(), "remote operation timed out: put_event");
    }
}
