//! Coordinate and location fix types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error returned when a coordinate pair is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid coordinates: {0}")]
pub struct InvalidCoordinates(pub String);

/// A bare latitude/longitude pair.
///
/// Used wherever only the position matters: geofence centers, event
/// locations, distance computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, `-90..=90`.
    pub latitude: f64,
    /// Longitude in degrees, `-180..=180`.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point without validation.
    ///
    /// Callers that accept external input should go through
    /// [`LocationFix::new`] instead, which validates.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A timestamped position sample, as stored in journey history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When the sample was taken (UTC).
    pub timestamp: DateTime<Utc>,
}

impl TrackPoint {
    /// The bare coordinate pair of this sample.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A raw location fix as delivered by the OS location provider.
///
/// Construction validates the coordinate pair. The accuracy filter
/// (fixes worse than 100 m are dropped) lives in the OS adapter, so
/// `accuracy` is informational here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reported horizontal accuracy in meters, if known.
    pub accuracy: Option<f64>,
    /// When the fix was taken (UTC).
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Creates a fix timestamped now.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinates`] if either coordinate is non-finite
    /// or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        Self::at(latitude, longitude, Utc::now())
    }

    /// Creates a fix with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinates`] if either coordinate is non-finite
    /// or out of range.
    pub fn at(
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, InvalidCoordinates> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinates(format!("latitude {latitude}")));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates(format!("longitude {longitude}")));
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp,
        })
    }

    /// Attaches a reported accuracy to the fix.
    #[must_use]
    pub const fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// The bare coordinate pair of this fix.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// The fix as a history sample.
    #[must_use]
    pub const fn track_point(&self) -> TrackPoint {
        TrackPoint {
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: self.timestamp,
        }
    }
}
