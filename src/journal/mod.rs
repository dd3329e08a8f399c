//! Durable, deduplicated journal of arrival/departure events.
//!
//! Each journey owns an append-only event log persisted locally. The
//! journal is the gate between classified geofence signals and the rest
//! of the engine:
//!
//! 1. A repeated `(geofence, kind)` within the 60 s dedup window is
//!    silently suppressed (`Ok(None)` — a designed no-op).
//! 2. Accepted events are persisted unsynced, then pushed to the remote
//!    store best-effort; a failed push leaves the event marked unsynced
//!    and the caller hands it to the delivery queue, whose flush covers
//!    the reconnect path. [`sync_unsynced`] replays any stragglers on
//!    restart.
//! 3. Only after acceptance does the geofence tracker commit the state
//!    flip, so suppressed signals never move the inside/outside bit.
//!
//! [`sync_unsynced`]: EventJournal::sync_unsynced

pub mod error;
pub mod types;

pub use error::{JournalError, Result};
pub use types::TransitionEvent;

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use crate::geofence::{GeofenceStateTracker, TransitionKind};
use crate::ids;
use crate::location::GeoPoint;
use crate::remote::RemoteStore;
use crate::storage::{keys, KvStore, KvStoreExt};

/// Window within which a repeated event of the same kind at the same
/// geofence is suppressed. Carried from the shipped tuning.
pub const DEDUP_WINDOW_MS: i64 = 60_000;

/// Durable event log with dedup and best-effort remote sync.
pub struct EventJournal {
    kv: Arc<dyn KvStore>,
    remote: Arc<dyn RemoteStore>,
    tracker: Arc<GeofenceStateTracker>,
    dedup_window: Duration,
}

impl EventJournal {
    /// Creates a journal with the standard 60 s dedup window.
    #[must_use]
    pub fn new(
        kv: Arc<dyn KvStore>,
        remote: Arc<dyn RemoteStore>,
        tracker: Arc<GeofenceStateTracker>,
    ) -> Self {
        Self {
            kv,
            remote,
            tracker,
            dedup_window: Duration::milliseconds(DEDUP_WINDOW_MS),
        }
    }

    /// Overrides the dedup window (tests tune this down).
    #[must_use]
    pub const fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Records a transition event for a journey.
    ///
    /// Returns `Ok(None)` when the event falls inside the dedup window —
    /// suppression is an expected outcome, not an error. On acceptance
    /// the event is persisted, pushed best-effort, and the geofence
    /// state committed.
    ///
    /// # Errors
    ///
    /// Returns an error if local persistence or the state commit fails.
    /// A failed remote push is not an error; the event stays unsynced.
    pub async fn record(
        &self,
        journey_id: &str,
        geofence_id: &str,
        geofence_name: &str,
        kind: TransitionKind,
        location: GeoPoint,
    ) -> Result<Option<TransitionEvent>> {
        let key = keys::journey_events(journey_id);
        let mut events: Vec<TransitionEvent> = self.kv.get_json(&key)?.unwrap_or_default();

        let now = chrono::Utc::now();
        let duplicate = events.iter().any(|e| {
            e.geofence_id == geofence_id
                && e.kind == kind
                && now.signed_duration_since(e.timestamp) < self.dedup_window
        });
        if duplicate {
            debug!(
                journey = %journey_id,
                geofence = %geofence_id,
                kind = kind.as_str(),
                "duplicate transition suppressed"
            );
            return Ok(None);
        }

        let mut event = TransitionEvent {
            id: ids::new_id("event"),
            journey_id: journey_id.to_string(),
            geofence_id: geofence_id.to_string(),
            geofence_name: geofence_name.to_string(),
            kind,
            timestamp: now,
            location,
            synced: false,
        };
        events.push(event.clone());
        self.kv.set_json(&key, &events)?;

        // Best-effort immediate push; a failure leaves the event for the
        // delivery queue or sync_unsynced to replay.
        match self.remote.put_event(journey_id, &event).await {
            Ok(()) => {
                event.synced = true;
                if let Some(stored) = events.iter_mut().find(|e| e.id == event.id) {
                    stored.synced = true;
                }
                self.kv.set_json(&key, &events)?;
            }
            Err(err) => {
                warn!(
                    journey = %journey_id,
                    event = %event.id,
                    error = %err,
                    "event push failed, will resync"
                );
            }
        }

        self.tracker.commit(geofence_id, kind, location)?;

        Ok(Some(event))
    }

    /// Replays every unsynced event of a journey to the remote store.
    ///
    /// Returns the number of events synced this call. Invoked on
    /// reconnect and on process start.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be loaded or persisted.
    /// Individual push failures are logged and skipped.
    pub async fn sync_unsynced(&self, journey_id: &str) -> Result<usize> {
        let key = keys::journey_events(journey_id);
        let mut events: Vec<TransitionEvent> = self.kv.get_json(&key)?.unwrap_or_default();

        let mut synced = 0;
        for event in events.iter_mut().filter(|e| !e.synced) {
            match self.remote.put_event(journey_id, event).await {
                Ok(()) => {
                    event.synced = true;
                    synced += 1;
                }
                Err(err) => {
                    warn!(
                        journey = %journey_id,
                        event = %event.id,
                        error = %err,
                        "event resync failed"
                    );
                }
            }
        }

        if synced > 0 {
            self.kv.set_json(&key, &events)?;
        }
        Ok(synced)
    }

    /// The full event log of a journey, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be loaded.
    pub fn events(&self, journey_id: &str) -> Result<Vec<TransitionEvent>> {
        Ok(self
            .kv
            .get_json(&keys::journey_events(journey_id))?
            .unwrap_or_default())
    }
}

/// Flips the synced flag of one persisted event.
///
/// Called by the delivery queue after it redelivers an event whose
/// inline push failed, so a later [`EventJournal::sync_unsynced`] does
/// not push it again. A missing event is ignored.
pub(crate) fn mark_synced(
    kv: &dyn KvStore,
    journey_id: &str,
    event_id: &str,
) -> crate::storage::Result<()> {
    let key = keys::journey_events(journey_id);
    let mut events: Vec<TransitionEvent> = kv.get_json(&key)?.unwrap_or_default();
    if let Some(event) = events.iter_mut().find(|e| e.id == event_id && !e.synced) {
        event.synced = true;
        kv.set_json(&key, &events)?;
    }
    Ok(())
}
