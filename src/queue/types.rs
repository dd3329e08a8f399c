//! Delivery queue item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::journal::TransitionEvent;

/// What a queued item delivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueuePayload {
    /// An encrypted location push to `locations/{destination_key}`.
    ///
    /// Carried in plaintext in the local queue and sealed at delivery
    /// time, so a change of credentials between enqueue and flush is
    /// impossible — the credential travels with the item.
    Location {
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
        /// When the location was recorded.
        timestamp: DateTime<Utc>,
        /// Sealing password for this sharing session.
        password: String,
        /// Publisher update interval, copied into the document.
        update_interval_secs: u32,
    },

    /// An event resync to `journeys/{journey_id}/events/{event.id}`.
    Event {
        /// Journey the event belongs to.
        journey_id: String,
        /// The event document.
        event: TransitionEvent,
    },
}

/// One entry in the durable delivery queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Queue-local id.
    pub id: String,
    /// Addressing key at the remote store (the share code for location
    /// pushes, the journey id for event pushes).
    pub destination_key: String,
    /// What to deliver.
    pub payload: QueuePayload,
    /// When the item was enqueued.
    pub queued_at: DateTime<Utc>,
    /// Failed delivery attempts so far.
    pub retries: u32,
}

/// Result of one flush pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushOutcome {
    /// Items delivered and removed.
    pub processed: usize,
    /// Items that failed this pass (kept or dropped per the policy).
    pub failed: usize,
}
