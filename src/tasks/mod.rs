//! Explicit background services.
//!
//! The engine regularly needs two things running outside the call stack:
//! OS geofence region monitoring and the periodic share-location push.
//! Both are modeled as explicit objects with `start`/`stop` instead of
//! ambient process-wide callback registrations, so lifecycle is visible
//! and testable.

pub mod error;

pub use error::{MonitorError, Result};

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::geofence::Geofence;

/// Async callback invoked on every share-task tick.
pub type TickCallback =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Seam for OS geofence region monitoring.
///
/// The platform adapter registers/unregisters zones with the OS and
/// feeds raw enter/exit signals back into
/// [`JourneyManager::handle_region_signal`](crate::journey::JourneyManager::handle_region_signal).
/// Both methods must be idempotent; the engine calls `stop_monitoring`
/// on every halt path without tracking whether monitoring is running.
pub trait RegionMonitor: Send + Sync {
    /// Registers the given zones for enter/exit callbacks.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS rejects the registration.
    fn start_monitoring(&self, geofences: &[Geofence]) -> Result<()>;

    /// Unregisters all zones. Safe to call when not monitoring.
    fn stop_monitoring(&self);
}

/// Periodic share-push driver.
///
/// Owns a tokio task that invokes its callback every `interval`,
/// starting immediately on `start`. `start` and `stop` are both
/// idempotent; dropping the task stops it.
pub struct ShareTask {
    interval: Duration,
    callback: TickCallback,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ShareTask {
    /// Creates a stopped task.
    #[must_use]
    pub fn new(interval: Duration, callback: TickCallback) -> Self {
        Self {
            interval,
            callback,
            handle: Mutex::new(None),
        }
    }

    /// Starts the periodic loop. A second call is a no-op.
    ///
    /// The first tick fires immediately, so starting a sharing session
    /// publishes a location right away rather than one interval later.
    pub fn start(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if handle.is_some() {
            return;
        }
        let callback = Arc::clone(&self.callback);
        let interval = self.interval;
        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                callback().await;
            }
        }));
        debug!(interval_ms = interval.as_millis() as u64, "share task started");
    }

    /// Stops the loop. Safe to call when already stopped.
    pub fn stop(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(handle) = handle.take() {
            handle.abort();
            debug!("share task stopped");
        }
    }

    /// Whether the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for ShareTask {
    fn drop(&mut self) {
        self.stop();
    }
}
