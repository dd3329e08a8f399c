//! Reusable fakes for engine integration tests.
//!
//! All collaborators behind the engine's OS seams are replaced with
//! in-memory recording fakes. No platform services are needed; every
//! test runs against a fresh `MemoryKvStore`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use beacon_core::geofence::{Geofence, StaticDirectory};
use beacon_core::journal::TransitionEvent;
use beacon_core::journey::JourneyManager;
use beacon_core::location::{LocationFix, LocationProvider, ProviderError};
use beacon_core::notify::{NotificationSink, WaypointAlert};
use beacon_core::remote::{
    Connectivity, JourneySummary, LocationDocument, RemoteError, RemoteStore,
};
use beacon_core::storage::MemoryKvStore;
use beacon_core::tasks::{MonitorError, RegionMonitor};

/// Remote store that records every write and can be switched to fail.
#[derive(Default)]
pub struct RecordingRemote {
    pub locations: Mutex<Vec<(String, LocationDocument)>>,
    pub journeys: Mutex<Vec<(String, JourneySummary)>>,
    pub events: Mutex<Vec<(String, TransitionEvent)>>,
    pub failing: AtomicBool,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::Network("injected failure".to_string()))
        } else {
            Ok(())
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteStore for RecordingRemote {
    async fn put_location(
        &self,
        share_code: &str,
        doc: &LocationDocument,
    ) -> Result<(), RemoteError> {
        self.check()?;
        self.locations
            .lock()
            .unwrap()
            .push((share_code.to_string(), doc.clone()));
        Ok(())
    }

    async fn put_journey(
        &self,
        journey_id: &str,
        summary: &JourneySummary,
    ) -> Result<(), RemoteError> {
        self.check()?;
        self.journeys
            .lock()
            .unwrap()
            .push((journey_id.to_string(), summary.clone()));
        Ok(())
    }

    async fn put_event(
        &self,
        journey_id: &str,
        event: &TransitionEvent,
    ) -> Result<(), RemoteError> {
        self.check()?;
        self.events
            .lock()
            .unwrap()
            .push((journey_id.to_string(), event.clone()));
        Ok(())
    }
}

/// Connectivity flag a test can flip mid-scenario.
pub struct ToggleConnectivity(AtomicBool);

impl ToggleConnectivity {
    pub fn online() -> Self {
        Self(AtomicBool::new(true))
    }

    pub fn offline() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for ToggleConnectivity {
    fn is_connected(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Location provider serving a settable fix.
pub struct ScriptedProvider {
    fix: Mutex<LocationFix>,
}

impl ScriptedProvider {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            fix: Mutex::new(LocationFix::new(latitude, longitude).unwrap()),
        }
    }

    pub fn move_to(&self, latitude: f64, longitude: f64) {
        *self.fix.lock().unwrap() = LocationFix::new(latitude, longitude).unwrap();
    }

    pub fn current(&self) -> LocationFix {
        *self.fix.lock().unwrap()
    }
}

#[async_trait]
impl LocationProvider for ScriptedProvider {
    async fn current_fix(&self) -> Result<LocationFix, ProviderError> {
        Ok(*self.fix.lock().unwrap())
    }
}

/// Region monitor recording what was registered.
#[derive(Default)]
pub struct RecordingMonitor {
    pub registered: Mutex<Vec<String>>,
    pub stop_calls: AtomicUsize,
}

impl RecordingMonitor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegionMonitor for RecordingMonitor {
    fn start_monitoring(&self, geofences: &[Geofence]) -> Result<(), MonitorError> {
        *self.registered.lock().unwrap() =
            geofences.iter().map(|g| g.id.clone()).collect();
        Ok(())
    }

    fn stop_monitoring(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.registered.lock().unwrap().clear();
    }
}

/// Notification sink collecting alerts.
#[derive(Default)]
pub struct RecordingSink {
    pub alerts: Mutex<Vec<WaypointAlert>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, alert: &WaypointAlert) {
        self.alerts.lock().unwrap().push(alert.clone());
    }
}

/// A fully wired engine plus handles to all of its fakes.
pub struct Engine {
    pub manager: JourneyManager,
    pub kv: Arc<MemoryKvStore>,
    pub remote: Arc<RecordingRemote>,
    pub connectivity: Arc<ToggleConnectivity>,
    pub provider: Arc<ScriptedProvider>,
    pub monitor: Arc<RecordingMonitor>,
    pub sink: Arc<RecordingSink>,
}

/// Wires a manager over fresh fakes and the given known zones.
///
/// The provider starts at `(start_lat, start_lon)`; connectivity starts
/// online.
pub fn engine_with_zones(
    zones: Vec<Geofence>,
    start_lat: f64,
    start_lon: f64,
) -> Engine {
    let kv = Arc::new(MemoryKvStore::new());
    let remote = Arc::new(RecordingRemote::new());
    let connectivity = Arc::new(ToggleConnectivity::online());
    let provider = Arc::new(ScriptedProvider::at(start_lat, start_lon));
    let monitor = Arc::new(RecordingMonitor::new());
    let sink = Arc::new(RecordingSink::new());
    let manager = JourneyManager::new(
        Arc::clone(&kv) as _,
        Arc::clone(&remote) as _,
        Arc::clone(&connectivity) as _,
        Arc::clone(&provider) as _,
        Arc::clone(&monitor) as _,
        Arc::clone(&sink) as _,
        Arc::new(StaticDirectory::new(zones)),
    );
    Engine {
        manager,
        kv,
        remote,
        connectivity,
        provider,
        monitor,
        sink,
    }
}

/// A second manager over the same store and fakes, as after a process
/// restart.
pub fn restart(engine: &Engine, zones: Vec<Geofence>) -> Engine {
    let manager = JourneyManager::new(
        Arc::clone(&engine.kv) as _,
        Arc::clone(&engine.remote) as _,
        Arc::clone(&engine.connectivity) as _,
        Arc::clone(&engine.provider) as _,
        Arc::clone(&engine.monitor) as _,
        Arc::clone(&engine.sink) as _,
        Arc::new(StaticDirectory::new(zones)),
    );
    Engine {
        manager,
        kv: Arc::clone(&engine.kv),
        remote: Arc::clone(&engine.remote),
        connectivity: Arc::clone(&engine.connectivity),
        provider: Arc::clone(&engine.provider),
        monitor: Arc::clone(&engine.monitor),
        sink: Arc::clone(&engine.sink),
    }
}

/// A 100 m zone with arrival and departure notifications enabled.
pub fn zone(id: &str, name: &str, latitude: f64, longitude: f64) -> Geofence {
    Geofence {
        id: id.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        radius_m: 100.0,
        notify_on_arrival: true,
        notify_on_departure: true,
        notify_contacts: false,
        active: true,
    }
}

/// Degrees of latitude spanning roughly `meters` on the ground.
pub fn lat_offset(meters: f64) -> f64 {
    meters / 111_195.0
}
