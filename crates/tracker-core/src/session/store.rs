//! Lock-guarded holder of the live session state

use parking_lot::RwLock;
use tracing::{debug, info};

use super::SessionState;
use crate::models::{
    DashboardSnapshot, DiagnosticTroubleCode, SpnEvent, TelemetryEvent, TrackerInfo, UpgradeFile,
    VehicleInfo,
};

/// Owns the single live `SessionState` of a running application.
///
/// All fields sit behind one `RwLock`: every setter and `reset()` takes the
/// write lock, `current_snapshot()` clones under the read lock. A snapshot
/// therefore never mixes values from before and after a single update.
/// Setters perform no validation and cannot fail.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned copy of every field at the instant of the call
    pub fn current_snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Clear session-scoped fields back to their defaults.
    ///
    /// `privacy_accepted` is install-scoped and survives.
    pub fn reset(&self) {
        Self::reset_locked(&mut self.state.write());
    }

    fn reset_locked(state: &mut SessionState) {
        state.clear_session();
        info!("Session state reset");
    }

    /// Start a fresh session on a new connection.
    ///
    /// Resets session-scoped fields, then records the connect time and marks
    /// stored events as requested, all under one write lock.
    pub fn begin_session(&self, connect_epoch_millis: i64) {
        let mut state = self.state.write();
        Self::reset_locked(&mut state);
        state.connect_timestamp = connect_epoch_millis;
        state.special_event_requested = true;
    }

    /// Record a special (stored) event and bump the counter, returning the new count
    pub fn record_special_event(&self, event: TelemetryEvent) -> u32 {
        let mut state = self.state.write();
        state.last_special_event = Some(event);
        state.special_event_count = state.special_event_count.saturating_add(1);
        state.special_event_count
    }

    /// Replace tracker info and, when a VIN was reported, the vehicle identifier
    pub fn apply_tracker_info(&self, info: TrackerInfo, vin: Option<String>) {
        let mut state = self.state.write();
        if let Some(vin) = vin {
            state.vehicle_identifier = vin;
        }
        state.tracker_info = Some(info);
    }

    /// Replace the dashboard snapshot and bind the updated parameter ids
    pub fn apply_dashboard(
        &self,
        snapshot: DashboardSnapshot,
        ids: impl IntoIterator<Item = i32>,
    ) {
        let mut state = self.state.write();
        state.dashboard_snapshot = Some(snapshot);
        state.active_dashboard_parameter_ids.extend(ids);
    }

    /// Whether a session is in progress (any session field off its default)
    pub fn is_active(&self) -> bool {
        self.state.read().is_active()
    }

    pub fn set_privacy_accepted(&self, accepted: bool) {
        self.state.write().privacy_accepted = accepted;
    }

    pub fn privacy_accepted(&self) -> bool {
        self.state.read().privacy_accepted
    }

    pub fn set_last_event(&self, event: TelemetryEvent) {
        debug!(seq = event.seq, kind = %event.kind, "Last event updated");
        self.state.write().last_event = Some(event);
    }

    /// Record the last special (stored) event received
    pub fn set_special_event(&self, event: TelemetryEvent) {
        self.state.write().last_special_event = Some(event);
    }

    /// Bump the special event counter, returning the new count
    pub fn increment_special_event_count(&self) -> u32 {
        let mut state = self.state.write();
        state.special_event_count = state.special_event_count.saturating_add(1);
        state.special_event_count
    }

    pub fn set_special_event_requested(&self, requested: bool) {
        self.state.write().special_event_requested = requested;
    }

    pub fn set_spn_event(&self, sequence: u32, event: SpnEvent) {
        let mut state = self.state.write();
        state.last_spn_sequence = sequence;
        state.last_spn_event = Some(event);
    }

    pub fn set_diagnostic_code(&self, dtc: DiagnosticTroubleCode) {
        self.state.write().last_diagnostic_code = Some(dtc);
    }

    pub fn set_tracker_info(&self, info: TrackerInfo) {
        self.state.write().tracker_info = Some(info);
    }

    pub fn set_vehicle_info(&self, info: VehicleInfo) {
        self.state.write().vehicle_info = Some(info);
    }

    pub fn set_vehicle_identifier(&self, identifier: impl Into<String>) {
        self.state.write().vehicle_identifier = identifier.into();
    }

    pub fn set_stored_event_count(&self, count: u32) {
        self.state.write().stored_event_count = Some(count);
    }

    pub fn set_system_variable(&self, value: impl Into<String>) {
        self.state.write().system_variable = value.into();
    }

    pub fn set_connect_timestamp(&self, epoch_millis: i64) {
        self.state.write().connect_timestamp = epoch_millis;
    }

    pub fn set_link_lost(&self, lost: bool) {
        self.state.write().link_lost = lost;
    }

    pub fn set_dashboard_snapshot(&self, snapshot: DashboardSnapshot) {
        self.state.write().dashboard_snapshot = Some(snapshot);
    }

    /// Bind a dashboard parameter; returns false if it was already bound
    pub fn add_dashboard_parameter_id(&self, id: i32) -> bool {
        self.state.write().active_dashboard_parameter_ids.insert(id)
    }

    /// Unbind a dashboard parameter; unknown ids are a no-op returning false
    pub fn remove_dashboard_parameter_id(&self, id: i32) -> bool {
        self.state.write().active_dashboard_parameter_ids.remove(&id)
    }

    pub fn set_upgrade_selection(&self, selection: i32) {
        self.state.write().pending_upgrade_selection = selection;
    }

    pub fn set_upgrade_file_content(&self, content: impl Into<bytes::Bytes>) {
        let file = UpgradeFile::new(content);
        debug!(
            len = file.len(),
            crc32 = format!("0x{:08X}", file.crc32()),
            "Upgrade file staged"
        );
        self.state.write().upgrade_file = Some(file);
    }
}
