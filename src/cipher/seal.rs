//! AES-256-GCM sealing of location payloads.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{CipherError, Result};
use super::key::derive_key;

/// Size of the AES-GCM nonce in bytes (96 bits).
const NONCE_SIZE: usize = 12;

/// The plaintext payload of a shared location update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharedLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When the location was recorded (UTC).
    pub timestamp: DateTime<Utc>,
}

/// An encrypted location payload as written to the remote store.
///
/// Both fields are base64. The ciphertext carries the GCM authentication
/// tag, so tampering is detected at [`open`] time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedLocation {
    /// Random per-message nonce (base64).
    pub iv: String,
    /// Ciphertext plus authentication tag (base64).
    pub ciphertext: String,
}

/// Encrypts a location payload for the given share-code + password pair.
///
/// A fresh random nonce is generated per call; sealing the same payload
/// twice yields different ciphertexts.
///
/// # Errors
///
/// Returns [`CipherError::Encryption`] if serialization or encryption
/// fails (both are practically infallible with valid inputs).
pub fn seal(location: &SharedLocation, password: &str, share_code: &str) -> Result<SealedLocation> {
    let key = derive_key(password, share_code);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CipherError::Encryption(format!("cipher init: {e}")))?;

    let plaintext = serde_json::to_vec(location)
        .map_err(|e| CipherError::Encryption(format!("serialize: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_slice())
        .map_err(|e| CipherError::Encryption(format!("encrypt: {e}")))?;

    Ok(SealedLocation {
        iv: STANDARD.encode(nonce_bytes),
        ciphertext: STANDARD.encode(ciphertext),
    })
}

/// Decrypts a sealed location payload.
///
/// # Errors
///
/// - [`CipherError::Malformed`] if the base64 fields or nonce size are
///   invalid.
/// - [`CipherError::Decryption`] if the share-code + password pair is
///   wrong or the payload fails authentication. This is surfaced to the
///   caller synchronously and never swallowed.
pub fn open(sealed: &SealedLocation, password: &str, share_code: &str) -> Result<SharedLocation> {
    let nonce_bytes = STANDARD
        .decode(&sealed.iv)
        .map_err(|e| CipherError::Malformed(format!("iv: {e}")))?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(CipherError::Malformed(format!(
            "iv length {} (expected {NONCE_SIZE})",
            nonce_bytes.len()
        )));
    }
    let ciphertext = STANDARD
        .decode(&sealed.ciphertext)
        .map_err(|e| CipherError::Malformed(format!("ciphertext: {e}")))?;

    let key = derive_key(password, share_code);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CipherError::Encryption(format!("cipher init: {e}")))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
        .map_err(|_| CipherError::Decryption)?;

    // A forged tag is caught above; a JSON failure here means the peer
    // sealed something that was never a SharedLocation.
    serde_json::from_slice(&plaintext).map_err(|e| CipherError::Malformed(format!("payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SharedLocation {
        SharedLocation {
            latitude: 37.7749,
            longitude: -122.4194,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn seal_open_roundtrip() {
        let original = payload();
        let sealed = seal(&original, "hunter2", "walk-home").unwrap();
        let opened = open(&sealed, "hunter2", "walk-home").unwrap();
        assert_eq!(opened, original);
    }

    #[test]
    fn wrong_password_is_decryption_error() {
        let sealed = seal(&payload(), "hunter2", "walk-home").unwrap();
        let err = open(&sealed, "wrong", "walk-home").unwrap_err();
        assert!(matches!(err, CipherError::Decryption));
    }

    #[test]
    fn wrong_share_code_is_decryption_error() {
        let sealed = seal(&payload(), "hunter2", "walk-home").unwrap();
        let err = open(&sealed, "hunter2", "other-code").unwrap_err();
        assert!(matches!(err, CipherError::Decryption));
    }

    #[test]
    fn tampered_ciphertext_is_decryption_error() {
        let mut sealed = seal(&payload(), "hunter2", "walk-home").unwrap();
        let mut bytes = STANDARD.decode(&sealed.ciphertext).unwrap();
        bytes[0] ^= 0xff;
        sealed.ciphertext = STANDARD.encode(bytes);
        let err = open(&sealed, "hunter2", "walk-home").unwrap_err();
        assert!(matches!(err, CipherError::Decryption));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let mut sealed = seal(&payload(), "hunter2", "walk-home").unwrap();
        sealed.iv = "not base64!!".to_string();
        let err = open(&sealed, "hunter2", "walk-home").unwrap_err();
        assert!(matches!(err, CipherError::Malformed(_)));
    }

    #[test]
    fn wrong_nonce_size_is_malformed() {
        let mut sealed = seal(&payload(), "hunter2", "walk-home").unwrap();
        sealed.iv = STANDARD.encode([0u8; 8]);
        let err = open(&sealed, "hunter2", "walk-home").unwrap_err();
        assert!(matches!(err, CipherError::Malformed(_)));
    }

    #[test]
    fn nonce_is_unique_per_seal() {
        let p = payload();
        let a = seal(&p, "pw", "code").unwrap();
        let b = seal(&p, "pw", "code").unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn sealed_location_json_roundtrip() {
        let sealed = seal(&payload(), "pw", "code").unwrap();
        let json = serde_json::to_string(&sealed).unwrap();
        let back: SealedLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sealed);
    }
}
