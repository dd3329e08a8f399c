//! Event log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geofence::TransitionKind;
use crate::location::GeoPoint;

/// A committed arrival or departure at a geofence.
///
/// Immutable once created, except for the `synced` flag which flips
/// false to true when the event reaches the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Id of the form `event_{millis}_{random}`.
    pub id: String,
    /// Journey this event belongs to.
    pub journey_id: String,
    /// Geofence where the transition happened.
    pub geofence_id: String,
    /// Geofence name at the time of the event (denormalized so the
    /// remote log stays readable if the zone is later renamed).
    pub geofence_name: String,
    /// Arrival or departure.
    pub kind: TransitionKind,
    /// When the transition was committed (UTC).
    pub timestamp: DateTime<Utc>,
    /// Where the user was.
    pub location: GeoPoint,
    /// Whether the event has reached the remote store.
    pub synced: bool,
}
