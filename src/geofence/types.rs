//! Geofence and transition types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::GeoPoint;

/// A named circular zone the user wants entry/exit tracked for.
///
/// Geofences are created and edited in the UI layer; the engine only
/// reads them (through a [`GeofenceDirectory`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    /// Stable identifier.
    pub id: String,
    /// User-facing name ("Home", "School").
    pub name: String,
    /// Center latitude in degrees.
    pub latitude: f64,
    /// Center longitude in degrees.
    pub longitude: f64,
    /// Nominal radius in meters.
    pub radius_m: f64,
    /// Whether arrivals here warrant a notification.
    pub notify_on_arrival: bool,
    /// Whether departures here warrant a notification.
    pub notify_on_departure: bool,
    /// Whether trusted contacts should be told about transitions.
    pub notify_contacts: bool,
    /// Inactive zones cannot be bound as journey waypoints.
    pub active: bool,
}

impl Geofence {
    /// The zone center.
    #[must_use]
    pub const fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Read-only lookup of geofence definitions.
///
/// The UI layer owns geofence CRUD; the engine resolves waypoint
/// references and notification settings through this seam.
pub trait GeofenceDirectory: Send + Sync {
    /// Returns the geofence with the given id, if it exists.
    fn get(&self, id: &str) -> Option<Geofence>;
}

/// Directory over a fixed list of geofences.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    zones: HashMap<String, Geofence>,
}

impl StaticDirectory {
    /// Builds a directory from a list of geofences.
    #[must_use]
    pub fn new(geofences: impl IntoIterator<Item = Geofence>) -> Self {
        Self {
            zones: geofences.into_iter().map(|g| (g.id.clone(), g)).collect(),
        }
    }
}

impl GeofenceDirectory for StaticDirectory {
    fn get(&self, id: &str) -> Option<Geofence> {
        self.zones.get(id).cloned()
    }
}

/// The two kinds of zone transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// The user entered the zone.
    Arrival,
    /// The user left the zone.
    Departure,
}

impl TransitionKind {
    /// Lowercase wire name, as stored in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrival => "arrival",
            Self::Departure => "departure",
        }
    }
}

/// A raw boundary signal from the platform's region monitor.
///
/// Signals are proposals, not facts: the OS fires them at the nominal
/// radius, so each one must clear the hysteresis band before it becomes
/// a [`TransitionKind`] on record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSignal {
    /// The monitor believes the user crossed into the region.
    Enter,
    /// The monitor believes the user crossed out of the region.
    Exit,
}

impl RegionSignal {
    /// The transition this signal proposes.
    #[must_use]
    pub const fn kind(self) -> TransitionKind {
        match self {
            Self::Enter => TransitionKind::Arrival,
            Self::Exit => TransitionKind::Departure,
        }
    }
}

/// Tracked inside/outside state for one geofence.
///
/// One entry per zone in the persisted state map. Mutated only by the
/// [`GeofenceStateTracker`](super::GeofenceStateTracker); survives
/// process restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceState {
    /// Whether the user is currently considered inside the zone.
    pub inside: bool,
    /// Kind of the last committed transition, if any.
    pub last_event: Option<TransitionKind>,
    /// When the last transition was committed.
    pub last_event_at: Option<DateTime<Utc>>,
    /// Where the user was at the last transition.
    pub last_location: Option<GeoPoint>,
}

impl GeofenceState {
    /// Fresh state with no committed transitions.
    #[must_use]
    pub const fn new(inside: bool) -> Self {
        Self {
            inside,
            last_event: None,
            last_event_at: None,
            last_location: None,
        }
    }
}
