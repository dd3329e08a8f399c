//! Notification decision seam.
//!
//! The engine decides *that* an arrival or departure warrants a
//! notification (the zone's `notify_on_arrival` / `notify_on_departure`
//! flags); the dispatcher collaborator owns wording, localization, and
//! delivery channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geofence::TransitionKind;

/// A transition the dispatcher should surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointAlert {
    /// Journey the transition belongs to.
    pub journey_id: String,
    /// Zone where it happened.
    pub geofence_id: String,
    /// Zone name for display.
    pub geofence_name: String,
    /// Arrival or departure.
    pub kind: TransitionKind,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Whether trusted contacts should also be told.
    pub notify_contacts: bool,
}

/// Push-notification dispatcher.
pub trait NotificationSink: Send + Sync {
    /// Surfaces an alert to the user (and contacts, if flagged).
    fn notify(&self, alert: &WaypointAlert);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_json_roundtrip() {
        let alert = WaypointAlert {
            journey_id: "j1".to_string(),
            geofence_id: "z1".to_string(),
            geofence_name: "Home".to_string(),
            kind: TransitionKind::Departure,
            timestamp: Utc::now(),
            notify_contacts: true,
        };
        let json = serde_json::to_string(&alert).unwrap();
        let back: WaypointAlert = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alert);
    }
}
