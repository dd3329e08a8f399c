//! Remote store document types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cipher::SealedLocation;
use crate::journey::JourneyStatus;
use crate::location::TrackPoint;

/// The document at `locations/{shareCode}`.
///
/// The coordinates themselves are inside `encrypted_data`; everything
/// else is plaintext metadata a viewer needs before decrypting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDocument {
    /// The sealed `{lat, lon, timestamp}` payload.
    pub encrypted_data: SealedLocation,
    /// When the location inside was recorded.
    pub timestamp: DateTime<Utc>,
    /// Whether the sharing session is still active.
    pub active: bool,
    /// Publisher's update interval in seconds, so viewers can size
    /// their staleness expectations.
    pub update_interval: u32,
    /// When this document was last written.
    pub last_update: DateTime<Utc>,
}

/// The document at `journeys/{journeyId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    /// Journey id.
    pub id: String,
    /// User-facing journey name.
    pub name: String,
    /// Destination label.
    pub destination: String,
    /// Lifecycle status.
    pub status: JourneyStatus,
    /// When the journey started, if it has.
    pub started_at: Option<DateTime<Utc>>,
    /// When the journey completed, if it has.
    pub completed_at: Option<DateTime<Utc>>,
    /// Latest known position.
    pub current_location: Option<TrackPoint>,
    /// Accumulated travel distance in meters.
    pub total_distance_m: f64,
}
