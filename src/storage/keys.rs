//! Fixed key names for engine state.
//!
//! The key shapes are shared with the mobile shell, which reads some of
//! them directly (the `@` prefix is its storage convention). Changing a
//! shape is a data migration.

/// Map of geofence id to tracked inside/outside state.
pub const GEOFENCE_STATES: &str = "@geofence_states";

/// The bounded offline delivery queue.
pub const OFFLINE_QUEUE: &str = "@offline_location_queue";

/// Id of the single active journey, if any.
pub const ACTIVE_JOURNEY: &str = "@active_journey";

/// The device's own live-sharing session.
pub const SHARING_SESSION: &str = "@journey_sharing_my_session";

/// Key of a journey document.
#[must_use]
pub fn journey(id: &str) -> String {
    format!("@journey_{id}")
}

/// Key of a journey's event log.
#[must_use]
pub fn journey_events(id: &str) -> String {
    format!("@journey_{id}_events")
}
