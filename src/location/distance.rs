//! Great-circle distance between coordinate pairs.

use super::types::GeoPoint;

/// Mean Earth radius in meters, as used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Computes the haversine distance between two points, in meters.
///
/// The haversine formula treats the Earth as a sphere of radius
/// 6 371 km, which is accurate to ~0.5% — more than enough for
/// geofence radii measured in tens to hundreds of meters.
///
/// # Examples
///
/// ```
/// use beacon_core::location::{haversine_meters, GeoPoint};
///
/// let sf = GeoPoint::new(37.7749, -122.4194);
/// let la = GeoPoint::new(34.0522, -118.2437);
/// let d = haversine_meters(sf, la);
/// assert!((d - 559_000.0).abs() < 5_000.0); // ~559 km
/// ```
#[must_use]
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
