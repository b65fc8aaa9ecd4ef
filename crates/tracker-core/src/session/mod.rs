//! Session state for a connected tracker
//!
//! `SessionState` is the plain value type (what a snapshot looks like);
//! `SessionStore` owns the single live instance and serializes access to it.

mod store;

pub use store::SessionStore;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{
    DashboardSnapshot, DiagnosticTroubleCode, SpnEvent, TelemetryEvent, TrackerInfo, UpgradeFile,
    VehicleInfo,
};

/// Sentinel held by string fields whose value is not known yet
pub const UNKNOWN: &str = "n/a";

/// Latest-known facts of a tracker session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    // Per install
    pub privacy_accepted: bool,

    // Per tracker session
    pub last_event: Option<TelemetryEvent>,
    pub last_special_event: Option<TelemetryEvent>,
    pub special_event_count: u32,
    pub last_spn_event: Option<SpnEvent>,
    pub last_spn_sequence: u32,
    pub last_diagnostic_code: Option<DiagnosticTroubleCode>,
    pub tracker_info: Option<TrackerInfo>,
    pub vehicle_info: Option<VehicleInfo>,
    pub vehicle_identifier: String,
    /// Events held in tracker storage, as last reported by the tracker
    pub stored_event_count: Option<u32>,
    pub pending_upgrade_selection: i32,
    pub upgrade_file: Option<UpgradeFile>,
    /// Epoch milliseconds of the last connect, 0 when never connected
    pub connect_timestamp: i64,
    pub link_lost: bool,
    pub special_event_requested: bool,
    pub dashboard_snapshot: Option<DashboardSnapshot>,
    pub active_dashboard_parameter_ids: BTreeSet<i32>,
    pub system_variable: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            privacy_accepted: false,
            last_event: None,
            last_special_event: None,
            special_event_count: 0,
            last_spn_event: None,
            last_spn_sequence: 0,
            last_diagnostic_code: None,
            tracker_info: None,
            vehicle_info: None,
            vehicle_identifier: UNKNOWN.to_string(),
            stored_event_count: None,
            pending_upgrade_selection: 0,
            upgrade_file: None,
            connect_timestamp: 0,
            link_lost: false,
            special_event_requested: false,
            dashboard_snapshot: None,
            active_dashboard_parameter_ids: BTreeSet::new(),
            system_variable: UNKNOWN.to_string(),
        }
    }
}

impl SessionState {
    /// Restore every session-scoped field to its default, keeping install-scoped ones
    pub(crate) fn clear_session(&mut self) {
        *self = Self {
            privacy_accepted: self.privacy_accepted,
            ..Self::default()
        };
    }

    /// Whether any session-scoped field holds a non-default value
    pub fn is_active(&self) -> bool {
        let idle = Self {
            privacy_accepted: self.privacy_accepted,
            ..Self::default()
        };
        *self != idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_hold_sentinels() {
        let state = SessionState::default();
        assert_eq!(state.vehicle_identifier, UNKNOWN);
        assert_eq!(state.system_variable, UNKNOWN);
        assert!(state.last_event.is_none());
        assert!(!state.is_active());
    }

    #[test]
    fn test_clear_session_keeps_privacy() {
        let mut state = SessionState {
            privacy_accepted: true,
            special_event_count: 3,
            link_lost: true,
            vehicle_identifier: "1FUJGLDR12LM12345".to_string(),
            ..SessionState::default()
        };
        assert!(state.is_active());

        state.clear_session();

        assert_eq!(
            state,
            SessionState {
                privacy_accepted: true,
                ..SessionState::default()
            }
        );
        assert!(!state.is_active());
    }
}
