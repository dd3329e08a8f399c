//! High-level journey lifecycle API.
//!
//! The [`JourneyManager`] owns the journey state machine and wires the
//! tracker, journal, and delivery queue together. It is the single
//! writer of journey documents; OS callbacks (region signals, location
//! fixes) and foreground commands (start/stop) may interleave, so every
//! mutator serializes its load-mutate-persist cycle behind one lock.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use super::error::{JourneyError, Result};
use super::types::{Journey, JourneyConfig, JourneyStatus, SharingSession, Waypoint};
use crate::geofence::{
    Geofence, GeofenceDirectory, GeofenceStateTracker, RegionSignal, TransitionKind,
};
use crate::ids;
use crate::journal::{EventJournal, TransitionEvent};
use crate::location::{haversine_meters, LocationFix, LocationProvider};
use crate::notify::{NotificationSink, WaypointAlert};
use crate::queue::{QueueItem, QueuePayload, SyncQueue};
use crate::remote::{Connectivity, RemoteStore};
use crate::storage::{keys, KvStore, KvStoreExt};
use crate::tasks::{MonitorError, RegionMonitor, ShareTask, TickCallback};

/// Orchestrates journey lifecycle, waypoint accounting, and sharing.
pub struct JourneyManager {
    kv: Arc<dyn KvStore>,
    remote: Arc<dyn RemoteStore>,
    provider: Arc<dyn LocationProvider>,
    monitor: Arc<dyn RegionMonitor>,
    notifier: Arc<dyn NotificationSink>,
    directory: Arc<dyn GeofenceDirectory>,
    tracker: Arc<GeofenceStateTracker>,
    journal: Arc<EventJournal>,
    queue: Arc<SyncQueue>,
    // Serializes load-mutate-persist cycles against reentrant callbacks.
    state_lock: tokio::sync::Mutex<()>,
    share_task: StdMutex<Option<ShareTask>>,
}

impl JourneyManager {
    /// Wires a manager over its collaborators.
    ///
    /// The tracker, journal, and delivery queue are constructed here so
    /// they share the same store and remote transport.
    #[must_use]
    pub fn new(
        kv: Arc<dyn KvStore>,
        remote: Arc<dyn RemoteStore>,
        connectivity: Arc<dyn Connectivity>,
        provider: Arc<dyn LocationProvider>,
        monitor: Arc<dyn RegionMonitor>,
        notifier: Arc<dyn NotificationSink>,
        directory: Arc<dyn GeofenceDirectory>,
    ) -> Self {
        let tracker = Arc::new(GeofenceStateTracker::new(Arc::clone(&kv)));
        let journal = Arc::new(EventJournal::new(
            Arc::clone(&kv),
            Arc::clone(&remote),
            Arc::clone(&tracker),
        ));
        let queue = Arc::new(SyncQueue::new(
            Arc::clone(&kv),
            Arc::clone(&remote),
            connectivity,
        ));
        Self {
            kv,
            remote,
            provider,
            monitor,
            notifier,
            directory,
            tracker,
            journal,
            queue,
            state_lock: tokio::sync::Mutex::new(()),
            share_task: StdMutex::new(None),
        }
    }

    /// The shared delivery queue (connectivity callbacks flush it).
    #[must_use]
    pub fn queue(&self) -> &Arc<SyncQueue> {
        &self.queue
    }

    /// The event journal.
    #[must_use]
    pub fn journal(&self) -> &Arc<EventJournal> {
        &self.journal
    }

    /// The geofence state tracker.
    #[must_use]
    pub fn tracker(&self) -> &Arc<GeofenceStateTracker> {
        &self.tracker
    }

    // ==================== Lifecycle ====================

    /// Creates a journey in `Created` status.
    ///
    /// # Errors
    ///
    /// - [`JourneyError::Validation`] for an empty name/destination,
    ///   sharing without credentials, or an inactive waypoint zone.
    /// - [`JourneyError::NotFound`] for an unknown waypoint geofence.
    /// - [`JourneyError::Storage`] if persisting fails.
    pub async fn create(&self, config: JourneyConfig) -> Result<Journey> {
        if config.name.trim().is_empty() {
            return Err(JourneyError::Validation("journey name is required".to_string()));
        }
        if config.destination.trim().is_empty() {
            return Err(JourneyError::Validation("destination is required".to_string()));
        }
        if config.share_location && (config.share_code.is_none() || config.password.is_none()) {
            return Err(JourneyError::Validation(
                "sharing requires a share code and password".to_string(),
            ));
        }

        let mut waypoints = Vec::with_capacity(config.waypoint_geofence_ids.len());
        for (order, geofence_id) in config.waypoint_geofence_ids.iter().enumerate() {
            let zone = self
                .directory
                .get(geofence_id)
                .ok_or_else(|| JourneyError::NotFound(format!("geofence {geofence_id}")))?;
            if !zone.active {
                return Err(JourneyError::Validation(format!(
                    "geofence {geofence_id} is inactive"
                )));
            }
            waypoints.push(Waypoint {
                geofence_id: zone.id,
                name: zone.name,
                latitude: zone.latitude,
                longitude: zone.longitude,
                radius_m: zone.radius_m,
                arrived: false,
                departed: false,
                arrival_time: None,
                departure_time: None,
                order: u32::try_from(order).unwrap_or(u32::MAX),
            });
        }

        let journey = Journey {
            id: ids::new_id("journey"),
            name: config.name,
            destination: config.destination,
            waypoints,
            share_location: config.share_location,
            share_code: config.share_code,
            password: config.password,
            update_interval_secs: config.update_interval_secs,
            status: JourneyStatus::Created,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            start_location: None,
            current_location: None,
            location_history: Vec::new(),
            events: Vec::new(),
            total_distance_m: 0.0,
        };

        let _guard = self.state_lock.lock().await;
        self.persist(&journey)?;
        Ok(journey)
    }

    /// Starts (or resumes from pause) a journey.
    ///
    /// Requires a fresh location fix. Seeds geofence states so zones the
    /// user already occupies fire no spurious arrival, starts region
    /// monitoring, and begins encrypted periodic pushes when sharing is
    /// enabled.
    ///
    /// # Errors
    ///
    /// - [`JourneyError::NotFound`] for an unknown journey.
    /// - [`JourneyError::InvalidTransition`] unless the journey is
    ///   `Created` or `Paused`.
    /// - [`JourneyError::AlreadyActive`] if a different journey is live.
    /// - [`JourneyError::PermissionDenied`] /
    ///   [`JourneyError::LocationUnavailable`] when no fix is obtainable.
    /// - [`JourneyError::Monitoring`] if region registration fails.
    pub async fn start(&self, id: &str) -> Result<Journey> {
        let _guard = self.state_lock.lock().await;
        let mut journey = self.load(id)?;

        match journey.status {
            JourneyStatus::Created | JourneyStatus::Paused => {}
            from => {
                return Err(JourneyError::InvalidTransition {
                    from,
                    action: "start",
                })
            }
        }

        if let Some(active_id) = self.kv.get(keys::ACTIVE_JOURNEY)? {
            if active_id != id {
                return Err(JourneyError::AlreadyActive(active_id));
            }
        }

        let fix = self.provider.current_fix().await?;
        let sample = fix.track_point();

        if journey.status == JourneyStatus::Created {
            journey.started_at = Some(Utc::now());
            journey.start_location = Some(sample);
            journey.location_history = vec![sample];
        } else {
            // Ground covered while paused still counts, keeping the
            // total equal to the sum over consecutive history samples.
            if let Some(previous) = journey.current_location {
                journey.total_distance_m += haversine_meters(previous.point(), fix.point());
            }
            journey.push_history(sample);
        }
        journey.current_location = Some(sample);

        let zones = Self::waypoint_zones(&journey);
        self.tracker.initialize(&zones, &fix)?;
        self.monitor.start_monitoring(&zones).map_err(|e| match e {
            MonitorError::PermissionDenied => JourneyError::PermissionDenied,
            MonitorError::Registration(reason) => JourneyError::Monitoring(reason),
        })?;

        if journey.share_location {
            self.begin_sharing(&journey)?;
        }

        journey.status = JourneyStatus::Active;
        self.persist(&journey)?;
        self.kv.set(keys::ACTIVE_JOURNEY, id)?;
        self.mirror_summary(&journey).await;

        Ok(journey)
    }

    /// Halts a journey, pausing or completing it.
    ///
    /// Monitoring and sharing are stopped on every call, so stopping an
    /// already-stopped journey is safe and changes nothing.
    ///
    /// # Errors
    ///
    /// - [`JourneyError::NotFound`] for an unknown journey.
    /// - [`JourneyError::InvalidTransition`] for a `Created` journey.
    pub async fn stop(&self, id: &str, complete: bool) -> Result<Journey> {
        let _guard = self.state_lock.lock().await;
        let mut journey = self.load(id)?;

        // Halt external activity unconditionally; both are idempotent.
        self.monitor.stop_monitoring();
        self.end_sharing()?;

        match journey.status {
            JourneyStatus::Active | JourneyStatus::Paused => {}
            JourneyStatus::Completed | JourneyStatus::Cancelled => return Ok(journey),
            JourneyStatus::Created => {
                return Err(JourneyError::InvalidTransition {
                    from: JourneyStatus::Created,
                    action: "stop",
                })
            }
        }

        if complete {
            journey.status = JourneyStatus::Completed;
            journey.completed_at = Some(Utc::now());
        } else {
            journey.status = JourneyStatus::Paused;
        }

        self.persist(&journey)?;
        self.clear_active_marker(id)?;
        self.mirror_summary(&journey).await;
        Ok(journey)
    }

    /// Cancels a journey. Terminal; cancelling twice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`JourneyError::NotFound`] for an unknown journey.
    /// - [`JourneyError::InvalidTransition`] for `Created` or
    ///   `Completed` journeys.
    pub async fn cancel(&self, id: &str) -> Result<Journey> {
        let _guard = self.state_lock.lock().await;
        let mut journey = self.load(id)?;

        match journey.status {
            JourneyStatus::Cancelled => return Ok(journey),
            JourneyStatus::Active | JourneyStatus::Paused => {}
            from => {
                return Err(JourneyError::InvalidTransition {
                    from,
                    action: "cancel",
                })
            }
        }

        self.monitor.stop_monitoring();
        self.end_sharing()?;

        journey.status = JourneyStatus::Cancelled;
        self.persist(&journey)?;
        self.clear_active_marker(id)?;
        self.mirror_summary(&journey).await;
        Ok(journey)
    }

    // ==================== Location & Events ====================

    /// Folds a fresh fix into an active journey.
    ///
    /// Accumulates haversine distance from the previous position,
    /// appends to the capped history, and mirrors the summary
    /// best-effort. A fix arriving after the journey stopped (callbacks
    /// race foreground commands) is ignored quietly.
    ///
    /// # Errors
    ///
    /// - [`JourneyError::NotFound`] for an unknown journey.
    /// - [`JourneyError::Storage`] if persisting fails.
    pub async fn update_location(&self, id: &str, fix: &LocationFix) -> Result<()> {
        let _guard = self.state_lock.lock().await;
        let mut journey = self.load(id)?;

        if journey.status != JourneyStatus::Active {
            debug!(journey = %id, status = ?journey.status, "fix ignored, journey not active");
            return Ok(());
        }

        if let Some(previous) = journey.current_location {
            journey.total_distance_m += haversine_meters(previous.point(), fix.point());
        }
        let sample = fix.track_point();
        journey.current_location = Some(sample);
        journey.push_history(sample);

        self.persist(&journey)?;
        self.mirror_summary(&journey).await;
        Ok(())
    }

    /// Classifies a raw OS region signal and records it if decisive.
    ///
    /// Computes the distance from the fix to the waypoint center and
    /// asks the tracker whether the proposed transition clears the
    /// hysteresis band. Suppressed signals return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`JourneyError::NotFound`] for an unknown journey or waypoint.
    pub async fn handle_region_signal(
        &self,
        id: &str,
        geofence_id: &str,
        signal: RegionSignal,
        fix: &LocationFix,
    ) -> Result<Option<TransitionEvent>> {
        let waypoint = {
            let journey = self.load(id)?;
            journey
                .waypoints
                .iter()
                .find(|w| w.geofence_id == geofence_id)
                .cloned()
                .ok_or_else(|| {
                    JourneyError::NotFound(format!("waypoint {geofence_id} in journey {id}"))
                })?
        };

        let distance = haversine_meters(fix.point(), waypoint.center());
        let kind = signal.kind();
        if !self
            .tracker
            .should_trigger(geofence_id, kind, distance, waypoint.radius_m)?
        {
            return Ok(None);
        }

        self.record_waypoint_event(id, geofence_id, kind, fix).await
    }

    /// Records an accepted transition against a journey waypoint.
    ///
    /// Delegates to the journal (which owns dedup and the state commit);
    /// on acceptance flips the waypoint's `arrived`/`departed` flag
    /// (once, never reset), mirrors the event into the journey document,
    /// and raises a notification if the zone asks for one.
    ///
    /// # Errors
    ///
    /// - [`JourneyError::NotFound`] for an unknown journey or waypoint.
    pub async fn record_waypoint_event(
        &self,
        id: &str,
        geofence_id: &str,
        kind: TransitionKind,
        fix: &LocationFix,
    ) -> Result<Option<TransitionEvent>> {
        let _guard = self.state_lock.lock().await;
        let mut journey = self.load(id)?;

        let name = journey
            .waypoints
            .iter()
            .find(|w| w.geofence_id == geofence_id)
            .map(|w| w.name.clone())
            .ok_or_else(|| {
                JourneyError::NotFound(format!("waypoint {geofence_id} in journey {id}"))
            })?;

        let Some(event) = self
            .journal
            .record(id, geofence_id, &name, kind, fix.point())
            .await?
        else {
            return Ok(None);
        };

        // An event whose immediate push failed rides the delivery
        // queue, so the reconnect flush covers it.
        if !event.synced {
            self.queue
                .enqueue(QueueItem {
                    id: ids::new_id("queue"),
                    destination_key: id.to_string(),
                    payload: QueuePayload::Event {
                        journey_id: id.to_string(),
                        event: event.clone(),
                    },
                    queued_at: Utc::now(),
                    retries: 0,
                })
                .await?;
        }

        if let Some(waypoint) = journey.waypoint_mut(geofence_id) {
            match kind {
                TransitionKind::Arrival if !waypoint.arrived => {
                    waypoint.arrived = true;
                    waypoint.arrival_time = Some(event.timestamp);
                }
                TransitionKind::Departure if !waypoint.departed => {
                    waypoint.departed = true;
                    waypoint.departure_time = Some(event.timestamp);
                }
                _ => {}
            }
        }
        journey.events.push(event.clone());
        self.persist(&journey)?;

        self.maybe_notify(&event);
        Ok(Some(event))
    }

    // ==================== Restart Recovery ====================

    /// Re-establishes the active journey after a process restart.
    ///
    /// Reloads the single `Active` journey (if any), restarts region
    /// monitoring and sharing, flushes the delivery queue, and replays
    /// any remaining unsynced events. Committed state transitions are
    /// not re-fired.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or monitoring cannot be
    /// re-registered.
    pub async fn resume(&self) -> Result<Option<Journey>> {
        let Some(active_id) = self.kv.get(keys::ACTIVE_JOURNEY)? else {
            return Ok(None);
        };

        let journey = match self.load(&active_id) {
            Ok(journey) if journey.status == JourneyStatus::Active => journey,
            _ => {
                // Stale marker from a crash mid-stop.
                warn!(journey = %active_id, "clearing stale active-journey marker");
                self.kv.remove(keys::ACTIVE_JOURNEY)?;
                return Ok(None);
            }
        };

        let zones = Self::waypoint_zones(&journey);
        self.monitor.start_monitoring(&zones).map_err(|e| match e {
            MonitorError::PermissionDenied => JourneyError::PermissionDenied,
            MonitorError::Registration(reason) => JourneyError::Monitoring(reason),
        })?;

        if journey.share_location {
            self.begin_sharing(&journey)?;
        }

        // Flush first: queued event items mark their journal copies
        // synced on delivery, so the replay below only picks up events
        // that never made it into the queue.
        self.queue.flush().await?;
        let replayed = self.journal.sync_unsynced(&journey.id).await?;
        if replayed > 0 {
            debug!(journey = %journey.id, replayed, "resynced events after restart");
        }

        Ok(Some(journey))
    }

    // ==================== Accessors ====================

    /// Loads a journey by id.
    ///
    /// # Errors
    ///
    /// Returns [`JourneyError::NotFound`] if it does not exist.
    pub fn journey(&self, id: &str) -> Result<Journey> {
        self.load(id)
    }

    /// The currently active journey, if any.
    ///
    /// A marker pointing at a missing journey reads as `None`; any other
    /// storage failure surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or the journey document cannot
    /// be decoded.
    pub fn active_journey(&self) -> Result<Option<Journey>> {
        match self.kv.get(keys::ACTIVE_JOURNEY)? {
            Some(id) => match self.load(&id) {
                Ok(journey) => Ok(Some(journey)),
                Err(JourneyError::NotFound(_)) => Ok(None),
                Err(err) => Err(err),
            },
            None => Ok(None),
        }
    }

    // ==================== Internals ====================

    fn load(&self, id: &str) -> Result<Journey> {
        self.kv
            .get_json(&keys::journey(id))?
            .ok_or_else(|| JourneyError::NotFound(format!("journey {id}")))
    }

    fn persist(&self, journey: &Journey) -> Result<()> {
        self.kv.set_json(&keys::journey(journey.id.as_str()), journey)?;
        Ok(())
    }

    fn clear_active_marker(&self, id: &str) -> Result<()> {
        if self.kv.get(keys::ACTIVE_JOURNEY)?.as_deref() == Some(id) {
            self.kv.remove(keys::ACTIVE_JOURNEY)?;
        }
        Ok(())
    }

    /// Best-effort summary mirror; failures are logged, never surfaced.
    async fn mirror_summary(&self, journey: &Journey) {
        if let Err(err) = self.remote.put_journey(&journey.id, &journey.summary()).await {
            warn!(journey = %journey.id, error = %err, "summary mirror failed");
        }
    }

    /// Region geometry for the tracker and the OS monitor, snapshotted
    /// from the journey's waypoints.
    fn waypoint_zones(journey: &Journey) -> Vec<Geofence> {
        journey
            .waypoints
            .iter()
            .map(|w| Geofence {
                id: w.geofence_id.clone(),
                name: w.name.clone(),
                latitude: w.latitude,
                longitude: w.longitude,
                radius_m: w.radius_m,
                notify_on_arrival: false,
                notify_on_departure: false,
                notify_contacts: false,
                active: true,
            })
            .collect()
    }

    /// Persists the sharing session and starts the periodic push task.
    fn begin_sharing(&self, journey: &Journey) -> Result<()> {
        let (Some(share_code), Some(password)) = (&journey.share_code, &journey.password) else {
            return Err(JourneyError::Validation(
                "sharing requires a share code and password".to_string(),
            ));
        };

        let session = SharingSession {
            journey_id: journey.id.clone(),
            share_code: share_code.clone(),
            update_interval_secs: journey.update_interval_secs,
            started_at: Utc::now(),
        };
        self.kv.set_json(keys::SHARING_SESSION, &session)?;

        let provider = Arc::clone(&self.provider);
        let queue = Arc::clone(&self.queue);
        let share_code = share_code.clone();
        let password = password.clone();
        let interval = journey.update_interval_secs;
        let callback: TickCallback = Arc::new(move || {
            let provider = Arc::clone(&provider);
            let queue = Arc::clone(&queue);
            let share_code = share_code.clone();
            let password = password.clone();
            Box::pin(async move {
                match provider.current_fix().await {
                    Ok(fix) => {
                        if let Err(err) = queue
                            .enqueue_location(
                                &share_code,
                                &password,
                                fix.latitude,
                                fix.longitude,
                                interval,
                            )
                            .await
                        {
                            warn!(error = %err, "failed to queue location push");
                        }
                    }
                    Err(err) => warn!(error = %err, "no fix for scheduled push"),
                }
            })
        });

        let task = ShareTask::new(Duration::from_secs(u64::from(interval)), callback);
        task.start();

        let mut slot = self
            .share_task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(previous) = slot.replace(task) {
            previous.stop();
        }
        Ok(())
    }

    /// Stops the push task and clears the session. Idempotent.
    fn end_sharing(&self) -> Result<()> {
        let task = self
            .share_task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.stop();
        }
        self.kv.remove(keys::SHARING_SESSION)?;
        Ok(())
    }

    /// Raises a notification when the zone's settings ask for one.
    fn maybe_notify(&self, event: &TransitionEvent) {
        let Some(zone) = self.directory.get(&event.geofence_id) else {
            return;
        };
        let wanted = match event.kind {
            TransitionKind::Arrival => zone.notify_on_arrival,
            TransitionKind::Departure => zone.notify_on_departure,
        };
        if wanted {
            self.notifier.notify(&WaypointAlert {
                journey_id: event.journey_id.clone(),
                geofence_id: event.geofence_id.clone(),
                geofence_name: event.geofence_name.clone(),
                kind: event.kind,
                timestamp: event.timestamp,
                notify_contacts: zone.notify_contacts,
            });
        }
    }
}
