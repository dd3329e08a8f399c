//! Key derivation from a share-code + password pair.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// PBKDF2 iteration count.
///
/// Matches the derivation strength used by the sharing protocol; both
/// publisher and viewer must use the same count to derive the same key.
const PBKDF2_ROUNDS: u32 = 10_000;

/// A derived AES-256 key, wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; 32],
}

impl DerivedKey {
    /// The raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

/// Derives the sealing key for a share-code + password pair.
///
/// PBKDF2-HMAC-SHA256 with the share code as salt. The share code doubles
/// as the addressing key in the remote store, so two sessions with the
/// same password but different codes produce unrelated keys.
#[must_use]
pub fn derive_key(password: &str, share_code: &str) -> DerivedKey {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        share_code.as_bytes(),
        PBKDF2_ROUNDS,
        &mut key,
    );
    DerivedKey { key }
}
