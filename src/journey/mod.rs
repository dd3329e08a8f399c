//! Journey lifecycle and tracking.
//!
//! A journey is a user-initiated trip with an ordered itinerary of
//! waypoint zones, an optional encrypted live-sharing stream, and a
//! capped trail of location samples. The [`JourneyManager`] is the
//! single entry point: it validates lifecycle transitions
//! (`Created -> Active <-> Paused -> Completed`, with `Cancelled`
//! reachable from the live states), folds OS region signals into
//! committed waypoint events, and recovers the active journey after a
//! process restart.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use beacon_core::geofence::StaticDirectory;
//! use beacon_core::journey::{JourneyConfig, JourneyManager};
//!
//! # async fn demo(
//! #     kv: Arc<dyn beacon_core::storage::KvStore>,
//! #     remote: Arc<dyn beacon_core::remote::RemoteStore>,
//! #     connectivity: Arc<dyn beacon_core::remote::Connectivity>,
//! #     provider: Arc<dyn beacon_core::location::LocationProvider>,
//! #     monitor: Arc<dyn beacon_core::tasks::RegionMonitor>,
//! #     notifier: Arc<dyn beacon_core::notify::NotificationSink>,
//! # ) -> Result<(), beacon_core::journey::JourneyError> {
//! let directory = Arc::new(StaticDirectory::new([]));
//! let manager = JourneyManager::new(
//!     kv, remote, connectivity, provider, monitor, notifier, directory,
//! );
//!
//! let journey = manager
//!     .create(JourneyConfig::new("Walk home", "Home"))
//!     .await?;
//! let journey = manager.start(&journey.id).await?;
//! manager.stop(&journey.id, true).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod types;

pub use error::{JourneyError, Result};
pub use manager::JourneyManager;
pub use types::{
    Journey, JourneyConfig, JourneyStatus, SharingSession, Waypoint, LOCATION_HISTORY_CAP,
};
