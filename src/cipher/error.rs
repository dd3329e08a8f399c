//! Error types for location payload sealing.

use thiserror::Error;

/// Error type for cipher operations.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The payload could not be decrypted.
    ///
    /// Either the share-code + password pair is wrong or the payload was
    /// corrupted in transit. AES-GCM authentication makes the two cases
    /// indistinguishable by design.
    #[error("decryption failed: wrong credentials or corrupt payload")]
    Decryption,

    /// The sealed payload is not well formed (bad base64, bad nonce size).
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Encrypting or serializing the plaintext failed.
    #[error("encryption failed: {0}")]
    Encryption(String),
}

/// Result type alias for cipher operations.
pub type Result<T> = std::result::Result<T, CipherError>;
