//! Geofence zones and arrival/departure classification.
//!
//! Raw enter/exit signals from the OS are noisy: a user sitting near a
//! zone boundary produces a stream of flip-flopping signals as GPS
//! jitter moves the estimate across the radius. The
//! [`GeofenceStateTracker`] keeps a persisted inside/outside bit per
//! zone and applies a hysteresis band around the boundary so only a
//! decisive crossing produces an event.
//!
//! # Hysteresis
//!
//! ```text
//!            inner          nominal         outer
//!         0.8 * r ........... r ........... 1.2 * r
//!   arrival fires              |              departure fires
//!   only below inner           |              only above outer
//!                 <- dead band, no events ->
//! ```
//!
//! Signals landing inside the dead band are suppressed. That is a
//! designed no-op, not an error.

pub mod error;
mod tracker;
pub mod types;

pub use error::{GeofenceError, Result};
pub use tracker::{GeofenceStateTracker, HysteresisConfig};
pub use types::{
    Geofence, GeofenceDirectory, GeofenceState, RegionSignal, StaticDirectory, TransitionKind,
};
