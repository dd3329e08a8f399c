//! Per-zone inside/outside tracking with boundary hysteresis.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::error::Result;
use super::types::{Geofence, GeofenceState, TransitionKind};
use crate::location::{haversine_meters, GeoPoint, LocationFix};
use crate::storage::{keys, KvStore, KvStoreExt};

/// Hysteresis band factors around the nominal radius.
///
/// The defaults (0.8 / 1.2, a ±20% band) come from the shipped tuning;
/// they are carried as configuration rather than re-derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisConfig {
    /// Arrival fires only below `radius * inner_factor`.
    pub inner_factor: f64,
    /// Departure fires only above `radius * outer_factor`.
    pub outer_factor: f64,
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self {
            inner_factor: 0.8,
            outer_factor: 1.2,
        }
    }
}

/// Decides whether raw OS enter/exit signals become real transitions.
///
/// Keeps one persisted [`GeofenceState`] row per zone. The tracker is
/// the only writer of that map; the journal calls [`commit`] after it
/// accepts an event, so a suppressed or deduplicated signal leaves the
/// state untouched.
///
/// [`commit`]: GeofenceStateTracker::commit
pub struct GeofenceStateTracker {
    kv: Arc<dyn KvStore>,
    config: HysteresisConfig,
}

impl GeofenceStateTracker {
    /// Creates a tracker over the given store with default hysteresis.
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self::with_config(kv, HysteresisConfig::default())
    }

    /// Creates a tracker with explicit hysteresis factors.
    #[must_use]
    pub const fn with_config(kv: Arc<dyn KvStore>, config: HysteresisConfig) -> Self {
        Self { kv, config }
    }

    /// Seeds inside/outside state for a set of zones from a known fix.
    ///
    /// Called when a journey starts: zones the user is already inside
    /// are marked `inside = true` without firing an arrival, so starting
    /// a journey at home does not announce "arrived at Home". All states
    /// are persisted as one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the state map cannot be loaded or persisted.
    pub fn initialize(&self, geofences: &[Geofence], fix: &LocationFix) -> Result<()> {
        let mut states = self.load_states()?;
        for zone in geofences {
            let distance = haversine_meters(fix.point(), zone.center());
            let inside = distance <= zone.radius_m;
            debug!(
                geofence = %zone.id,
                distance_m = distance,
                inside,
                "seeding geofence state"
            );
            states.insert(zone.id.clone(), GeofenceState::new(inside));
        }
        self.store_states(&states)
    }

    /// Whether a proposed transition should produce an event.
    ///
    /// Applies the hysteresis band:
    /// - no prior state: trigger iff `distance <= radius`;
    /// - currently inside: only a departure beyond `radius * 1.2`;
    /// - currently outside: only an arrival within `radius * 0.8`.
    ///
    /// A `false` here is flicker suppression, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the state map cannot be loaded.
    pub fn should_trigger(
        &self,
        geofence_id: &str,
        proposed: TransitionKind,
        distance_m: f64,
        radius_m: f64,
    ) -> Result<bool> {
        let states = self.load_states()?;
        let decision = states.get(geofence_id).map_or_else(
            || distance_m <= radius_m,
            |state| {
                if state.inside {
                    proposed == TransitionKind::Departure
                        && distance_m > radius_m * self.config.outer_factor
                } else {
                    proposed == TransitionKind::Arrival
                        && distance_m < radius_m * self.config.inner_factor
                }
            },
        );
        if !decision {
            debug!(
                geofence = %geofence_id,
                kind = proposed.as_str(),
                distance_m,
                radius_m,
                "transition suppressed by hysteresis"
            );
        }
        Ok(decision)
    }

    /// Records an accepted transition.
    ///
    /// Called by the event journal once an event has been accepted, not
    /// on every raw signal. Flips the inside bit and stamps the last
    /// event metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the state map cannot be loaded or persisted.
    pub fn commit(&self, geofence_id: &str, kind: TransitionKind, location: GeoPoint) -> Result<()> {
        let mut states = self.load_states()?;
        let state = states
            .entry(geofence_id.to_string())
            .or_insert_with(|| GeofenceState::new(false));
        state.inside = kind == TransitionKind::Arrival;
        state.last_event = Some(kind);
        state.last_event_at = Some(Utc::now());
        state.last_location = Some(location);
        self.store_states(&states)
    }

    /// Current state of a zone, if tracked.
    ///
    /// # Errors
    ///
    /// Returns an error if the state map cannot be loaded.
    pub fn state(&self, geofence_id: &str) -> Result<Option<GeofenceState>> {
        Ok(self.load_states()?.remove(geofence_id))
    }

    fn load_states(&self) -> Result<HashMap<String, GeofenceState>> {
        Ok(self
            .kv
            .get_json(keys::GEOFENCE_STATES)?
            .unwrap_or_default())
    }

    fn store_states(&self, states: &HashMap<String, GeofenceState>) -> Result<()> {
        self.kv.set_json(keys::GEOFENCE_STATES, states)?;
        Ok(())
    }
}
