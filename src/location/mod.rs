//! Location primitives for the sync engine.
//!
//! Provides:
//! - Coordinate types ([`GeoPoint`], [`TrackPoint`], [`LocationFix`])
//! - Great-circle distance ([`haversine_meters`])
//! - The OS location provider seam ([`LocationProvider`])
//!
//! # Coordinate Contract
//!
//! Every coordinate entering the engine is validated at construction:
//! finite, latitude in `-90..=90`, longitude in `-180..=180`. Fixes with
//! accuracy worse than 100 m are discarded by the OS adapter before they
//! reach this crate, so accuracy is carried but never re-checked here.
//!
//! # Example
//!
//! ```
//! use beacon_core::location::{haversine_meters, GeoPoint, LocationFix};
//!
//! let fix = LocationFix::new(37.7749, -122.4194).unwrap();
//! let office = GeoPoint::new(37.7793, -122.4193);
//! let meters = haversine_meters(fix.point(), office);
//! assert!(meters > 400.0 && meters < 600.0);
//! ```

pub mod distance;
pub mod provider;
pub mod types;

pub use distance::haversine_meters;
pub use provider::{LocationProvider, ProviderError};
pub use types::{GeoPoint, LocationFix, TrackPoint};
