//! Bounded, durable, retrying delivery queue.
//!
//! The single delivery mechanism for everything the engine sends while
//! offline or flaky: encrypted location pushes and event resyncs both
//! ride the same queue.
//!
//! # Behavior
//!
//! - Capacity 100; enqueueing into a full queue evicts the oldest item
//!   with a logged warning.
//! - `flush` is a no-op while offline ([`Connectivity`]), never an error.
//! - Items are delivered FIFO. A failure bumps the item's retry count;
//!   once the [`RetryPolicy`] is exhausted the item is dropped with a
//!   warning. Permanent loss is preferred over a queue that can never
//!   drain.
//! - The surviving items are persisted as one replaced list, so a crash
//!   mid-flush re-attempts at most some already-delivered items.
//!
//! Location payloads are sealed with [`crate::cipher`] at delivery time.

pub mod error;
mod retry;
pub mod types;

pub use error::{QueueError, Result};
pub use retry::RetryPolicy;
pub use types::{FlushOutcome, QueueItem, QueuePayload};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::cipher::{seal, SharedLocation};
use crate::ids;
use crate::remote::{Connectivity, LocationDocument, RemoteStore};
use crate::storage::{keys, KvStore, KvStoreExt};

/// Maximum queued items before the oldest is evicted.
pub const QUEUE_CAPACITY: usize = 100;

/// Durable FIFO delivery queue over the remote store.
pub struct SyncQueue {
    kv: Arc<dyn KvStore>,
    remote: Arc<dyn RemoteStore>,
    connectivity: Arc<dyn Connectivity>,
    policy: RetryPolicy,
    capacity: usize,
    flush_lock: tokio::sync::Mutex<()>,
}

impl SyncQueue {
    /// Creates a queue with the default capacity and retry policy.
    #[must_use]
    pub fn new(
        kv: Arc<dyn KvStore>,
        remote: Arc<dyn RemoteStore>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            kv,
            remote,
            connectivity,
            policy: RetryPolicy::default(),
            capacity: QUEUE_CAPACITY,
            flush_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Overrides the retry policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Overrides the capacity (tests shrink this).
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds and enqueues a location push, then flushes immediately.
    ///
    /// # Errors
    ///
    /// Returns an error only on local persistence failure.
    pub async fn enqueue_location(
        &self,
        share_code: &str,
        password: &str,
        latitude: f64,
        longitude: f64,
        update_interval_secs: u32,
    ) -> Result<FlushOutcome> {
        self.enqueue(QueueItem {
            id: ids::new_id("queue"),
            destination_key: share_code.to_string(),
            payload: QueuePayload::Location {
                latitude,
                longitude,
                timestamp: Utc::now(),
                password: password.to_string(),
                update_interval_secs,
            },
            queued_at: Utc::now(),
            retries: 0,
        })
        .await
    }

    /// Appends an item (evicting the oldest if full) and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error only on local persistence failure; delivery
    /// failures are reported through the returned [`FlushOutcome`].
    pub async fn enqueue(&self, item: QueueItem) -> Result<FlushOutcome> {
        {
            let _guard = self.flush_lock.lock().await;
            let mut items = self.load()?;
            if items.len() >= self.capacity {
                let evicted = items.remove(0);
                warn!(
                    item = %evicted.id,
                    capacity = self.capacity,
                    "queue full, evicting oldest item"
                );
            }
            items.push(item);
            self.store(&items)?;
        }
        self.flush().await
    }

    /// Delivers queued items FIFO.
    ///
    /// Offline is a quiet no-op. Serialized internally: a connectivity
    /// callback racing a startup flush waits instead of double-sending.
    ///
    /// # Errors
    ///
    /// Returns an error only on local persistence failure.
    pub async fn flush(&self) -> Result<FlushOutcome> {
        let _guard = self.flush_lock.lock().await;

        if !self.connectivity.is_connected() {
            debug!("offline, skipping queue flush");
            return Ok(FlushOutcome::default());
        }

        let items = self.load()?;
        if items.is_empty() {
            return Ok(FlushOutcome::default());
        }

        let mut outcome = FlushOutcome::default();
        let mut remaining = Vec::new();

        for mut item in items {
            match self.deliver(&item).await {
                Ok(()) => outcome.processed += 1,
                Err(reason) => {
                    outcome.failed += 1;
                    item.retries += 1;
                    if self.policy.should_retry(item.retries) {
                        remaining.push(item);
                    } else {
                        warn!(
                            item = %item.id,
                            destination = %item.destination_key,
                            retries = item.retries,
                            reason = %reason,
                            "dropping item after exhausting retries"
                        );
                    }
                }
            }
        }

        self.store(&remaining)?;
        Ok(outcome)
    }

    /// Number of items currently queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue cannot be loaded.
    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Whether the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue cannot be loaded.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.load()?.is_empty())
    }

    /// Attempts one delivery; the error string is for the drop log.
    async fn deliver(&self, item: &QueueItem) -> std::result::Result<(), String> {
        match &item.payload {
            QueuePayload::Location {
                latitude,
                longitude,
                timestamp,
                password,
                update_interval_secs,
            } => {
                let sealed = seal(
                    &SharedLocation {
                        latitude: *latitude,
                        longitude: *longitude,
                        timestamp: *timestamp,
                    },
                    password,
                    &item.destination_key,
                )
                .map_err(|e| e.to_string())?;
                let doc = LocationDocument {
                    encrypted_data: sealed,
                    timestamp: *timestamp,
                    active: true,
                    update_interval: *update_interval_secs,
                    last_update: Utc::now(),
                };
                self.remote
                    .put_location(&item.destination_key, &doc)
                    .await
                    .map_err(|e| e.to_string())
            }
            QueuePayload::Event { journey_id, event } => {
                self.remote
                    .put_event(journey_id, event)
                    .await
                    .map_err(|e| e.to_string())?;
                // The journal copy stops being replayed once delivered.
                crate::journal::mark_synced(self.kv.as_ref(), journey_id, &event.id)
                    .map_err(|e| e.to_string())
            }
        }
    }

    fn load(&self) -> Result<Vec<QueueItem>> {
        Ok(self.kv.get_json(keys::OFFLINE_QUEUE)?.unwrap_or_default())
    }

    fn store(&self, items: &[QueueItem]) -> Result<()> {
        self.kv.set_json(keys::OFFLINE_QUEUE, &items)?;
        Ok(())
    }
}
