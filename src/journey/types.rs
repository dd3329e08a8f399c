//! Journey, waypoint, and sharing-session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::journal::TransitionEvent;
use crate::location::{GeoPoint, TrackPoint};
use crate::remote::JourneySummary;

/// Cap on the retained location history; the oldest sample is dropped
/// first once the ring is full.
pub const LOCATION_HISTORY_CAP: usize = 1000;

/// Journey lifecycle status.
///
/// ```text
/// created -> active -> {paused, completed, cancelled}
///             ^            |
///             +-- paused --+  (resume is the only re-entry)
/// ```
///
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JourneyStatus {
    /// Configured but not yet started.
    Created,
    /// Monitoring and (optionally) sharing are live.
    Active,
    /// Temporarily halted; can go active again.
    Paused,
    /// Finished normally. Terminal.
    Completed,
    /// Abandoned. Terminal.
    Cancelled,
}

impl JourneyStatus {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A geofence bound into a journey's itinerary.
///
/// Geometry is snapshotted from the geofence at creation time so the
/// journey stays coherent if the zone is later edited. The `arrived` and
/// `departed` flags each flip false to true exactly once and are never
/// reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// The underlying geofence.
    pub geofence_id: String,
    /// Zone name at binding time.
    pub name: String,
    /// Center latitude in degrees.
    pub latitude: f64,
    /// Center longitude in degrees.
    pub longitude: f64,
    /// Nominal radius in meters.
    pub radius_m: f64,
    /// Whether the user has arrived here during this journey.
    pub arrived: bool,
    /// Whether the user has departed from here during this journey.
    pub departed: bool,
    /// When the arrival happened.
    pub arrival_time: Option<DateTime<Utc>>,
    /// When the departure happened.
    pub departure_time: Option<DateTime<Utc>>,
    /// Itinerary position, 0-based.
    pub order: u32,
}

impl Waypoint {
    /// The waypoint center.
    #[must_use]
    pub const fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Configuration for creating a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyConfig {
    /// User-facing journey name. Must be non-empty.
    pub name: String,
    /// Destination label. Must be non-empty.
    pub destination: String,
    /// Geofence ids to bind as waypoints, in itinerary order.
    pub waypoint_geofence_ids: Vec<String>,
    /// Whether to publish encrypted live location.
    pub share_location: bool,
    /// Addressing code for the shared stream. Required when sharing.
    pub share_code: Option<String>,
    /// Sealing password for the shared stream. Required when sharing.
    pub password: Option<String>,
    /// Seconds between location pushes while sharing.
    pub update_interval_secs: u32,
}

impl JourneyConfig {
    /// A non-sharing journey with the given name and destination.
    #[must_use]
    pub fn new(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            destination: destination.into(),
            waypoint_geofence_ids: Vec::new(),
            share_location: false,
            share_code: None,
            password: None,
            update_interval_secs: 60,
        }
    }
}

/// A user-initiated tracked trip.
///
/// Single writer: the [`JourneyManager`](super::JourneyManager). At most
/// one journey is `Active` per device at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    /// Id of the form `journey_{millis}_{random}`.
    pub id: String,
    /// User-facing name.
    pub name: String,
    /// Destination label.
    pub destination: String,
    /// Itinerary zones.
    pub waypoints: Vec<Waypoint>,
    /// Whether encrypted live sharing is enabled.
    pub share_location: bool,
    /// Addressing code of the shared stream.
    pub share_code: Option<String>,
    /// Sealing password of the shared stream.
    pub password: Option<String>,
    /// Seconds between location pushes while sharing.
    pub update_interval_secs: u32,
    /// Lifecycle status.
    pub status: JourneyStatus,
    /// When the journey was created.
    pub created_at: DateTime<Utc>,
    /// When the journey went active for the first time.
    pub started_at: Option<DateTime<Utc>>,
    /// When the journey completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// First fix of the journey.
    pub start_location: Option<TrackPoint>,
    /// Latest fix of the journey.
    pub current_location: Option<TrackPoint>,
    /// Ring of recent fixes, capped at [`LOCATION_HISTORY_CAP`].
    pub location_history: Vec<TrackPoint>,
    /// Committed transition events, mirrored from the journal for the
    /// journey detail view.
    pub events: Vec<TransitionEvent>,
    /// Accumulated haversine distance over consecutive history points,
    /// in meters. Monotonically non-decreasing.
    pub total_distance_m: f64,
}

impl Journey {
    /// Appends a history sample, dropping the oldest once full.
    pub fn push_history(&mut self, sample: TrackPoint) {
        self.location_history.push(sample);
        if self.location_history.len() > LOCATION_HISTORY_CAP {
            let overflow = self.location_history.len() - LOCATION_HISTORY_CAP;
            self.location_history.drain(..overflow);
        }
    }

    /// Mutable access to the waypoint bound to `geofence_id`.
    pub fn waypoint_mut(&mut self, geofence_id: &str) -> Option<&mut Waypoint> {
        self.waypoints
            .iter_mut()
            .find(|w| w.geofence_id == geofence_id)
    }

    /// The remote-store summary of this journey.
    #[must_use]
    pub fn summary(&self) -> JourneySummary {
        JourneySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            destination: self.destination.clone(),
            status: self.status,
            started_at: self.started_at,
            completed_at: self.completed_at,
            current_location: self.current_location,
            total_distance_m: self.total_distance_m,
        }
    }
}

/// The device's own live-sharing session, persisted so a process
/// restart can re-establish the periodic pushes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingSession {
    /// Journey being shared.
    pub journey_id: String,
    /// Addressing code of the stream.
    pub share_code: String,
    /// Seconds between pushes.
    pub update_interval_secs: u32,
    /// When sharing started.
    pub started_at: DateTime<Utc>,
}
