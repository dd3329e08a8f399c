//! Location payload sealing for shared journeys.
//!
//! A shared journey is addressed by a user-chosen share code and protected
//! by a password. This module turns a `{lat, lon, timestamp}` payload into
//! an opaque [`SealedLocation`] that only a holder of the same share-code +
//! password pair can open.
//!
//! # Key Domain
//!
//! The key is derived from the password salted with the share code
//! (PBKDF2-HMAC-SHA256). This is a separate cipher domain from any
//! device-local storage encryption; the two never share key material.
//!
//! # Example
//!
//! ```
//! use beacon_core::cipher::{open, seal, SharedLocation};
//! use chrono::Utc;
//!
//! let payload = SharedLocation {
//!     latitude: 37.7749,
//!     longitude: -122.4194,
//!     timestamp: Utc::now(),
//! };
//! let sealed = seal(&payload, "hunter2", "walk-home-42").unwrap();
//! let opened = open(&sealed, "hunter2", "walk-home-42").unwrap();
//! assert_eq!(opened.latitude, payload.latitude);
//!
//! // A wrong password fails loudly, never silently.
//! assert!(open(&sealed, "wrong", "walk-home-42").is_err());
//! ```

mod error;
mod key;
mod seal;

pub use error::{CipherError, Result};
pub use key::{derive_key, DerivedKey};
pub use seal::{open, seal, SealedLocation, SharedLocation};
