//! Local durable key-value storage.
//!
//! The engine persists all of its state (journeys, event logs, geofence
//! states, the offline queue) through the narrow [`KvStore`] seam: string
//! keys, JSON string values, whole-value replace on write. The fixed key
//! names live in [`keys`].
//!
//! # Implementations
//!
//! - [`SqliteKvStore`] — the production store, a single `SQLite` table
//!   behind a mutex.
//! - `MemoryKvStore` — a `HashMap` store for tests (`test-utils` feature).
//!
//! # Consistency
//!
//! Writes replace the whole value for a key. Concurrent writers to the
//! same key resolve last-writer-wins; within one process the managers
//! serialize their read-modify-write cycles, see [`crate::journey`].

pub mod error;
pub mod keys;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod sqlite;

pub use error::{Result, StorageError};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Durable string key-value store.
///
/// Every operation is atomic with respect to a single key. Values are
/// JSON documents produced and consumed via [`KvStoreExt`].
pub trait KvStore: Send + Sync {
    /// Reads the value for `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON convenience layer over [`KvStore`].
pub trait KvStoreExt: KvStore {
    /// Reads and deserializes the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error on store failure or if the stored JSON does not
    /// deserialize into `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serializes and writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error on store or serialization failure.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
