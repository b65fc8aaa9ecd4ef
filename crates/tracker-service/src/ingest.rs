//! Event ingestion
//!
//! Translates inbound tracker messages (events, request responses, link and
//! firmware updates) into session state mutations, publishes a
//! `TrackerAction` for each change, and returns the outbound messages the
//! tracker expects in reply (acknowledgements and follow-up requests).

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracker_core::{
    DashboardSnapshot, DiagnosticTroubleCode, SessionStore, SpnEvent, TelemetryEvent, TrackerInfo,
    VehicleInfo,
};

use crate::config::TrackerConfig;
use crate::error::IngestError;
use crate::notify::{DtcAction, Notifier, TrackerAction, UpdateAction};

/// Message received from the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerMessage {
    /// BLE link established and services discovered
    DeviceReady,
    /// USB serial link established
    SerialConnected,
    /// Hardware link dropped without a clean disconnect
    LinkLost,
    Disconnected {
        #[serde(default)]
        code: i32,
    },
    TelemetryEvent {
        event: TelemetryEvent,
    },
    /// Event replayed from tracker storage
    StoredTelemetryEvent {
        event: TelemetryEvent,
    },
    SpnEvent {
        sequence: u32,
        event: SpnEvent,
    },
    /// Reply to a request sent to the tracker
    Response {
        #[serde(default)]
        status: i32,
        response: TrackerResponse,
    },
    DashboardUpdated {
        snapshot: DashboardSnapshot,
        #[serde(default)]
        updated_params: Vec<i32>,
    },
    FirmwareUpToDate,
    FirmwareUpdateStarted {
        file: String,
    },
    FirmwareUpdateProgress {
        percent: u32,
    },
    FirmwareUpdateCompleted,
    FirmwareUpdateFailed {
        code: i32,
        cause: String,
    },
    FirmwareUpdated {
        info: TrackerInfo,
    },
}

/// Response payloads, by request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackerResponse {
    TrackerInfo {
        info: TrackerInfo,
        /// VIN tag; `None` when the tracker omitted it
        #[serde(default)]
        vin: Option<String>,
    },
    VehicleInfo {
        info: VehicleInfo,
    },
    DiagTroubleCodes {
        dtc: DiagnosticTroubleCode,
    },
    ClearDiagTroubleCodes,
    StoredEventsCount {
        count: u32,
    },
    ClearStoredEvents,
    RetrieveStoredEvents,
    GetSystemVar {
        tag: String,
        value: String,
    },
    SetSystemVar,
    ConfigureSpnEvent,
}

impl TrackerResponse {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TrackerInfo { .. } => "GetTrackerInfoResponse",
            Self::VehicleInfo { .. } => "GetVehicleInfoResponse",
            Self::DiagTroubleCodes { .. } => "GetDiagTroubleCodesResponse",
            Self::ClearDiagTroubleCodes => "ClearDiagTroubleCodesResponse",
            Self::StoredEventsCount { .. } => "GetStoredEventsCountResponse",
            Self::ClearStoredEvents => "ClearStoredEventsResponse",
            Self::RetrieveStoredEvents => "RetrieveStoredEventsResponse",
            Self::GetSystemVar { .. } => "GetSystemVarResponse",
            Self::SetSystemVar => "SetSystemVarResponse",
            Self::ConfigureSpnEvent => "ConfigureSPNEventResponse",
        }
    }
}

/// Message to send back to the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    AckEvent { status: i32, seq: u32, date: String },
    AckSpnEvent { status: i32, sequence: u32 },
    GetTrackerInfo,
    GetStoredEventsCount,
    RetrieveStoredEvents,
    GetSystemVar { tag: String },
    SetVirtualDashboard { enabled: bool },
}

/// Applies tracker messages to the shared session state
pub struct TrackerEvents {
    session: Arc<SessionStore>,
    notifier: Notifier,
    config: TrackerConfig,
}

impl TrackerEvents {
    pub fn new(session: Arc<SessionStore>, notifier: Notifier, config: TrackerConfig) -> Self {
        Self {
            session,
            notifier,
            config,
        }
    }

    /// Apply one message, returning what should be sent back to the tracker
    pub fn handle(&self, message: TrackerMessage) -> Vec<Outbound> {
        match message {
            TrackerMessage::DeviceReady | TrackerMessage::SerialConnected => self.on_connected(),
            TrackerMessage::LinkLost => {
                warn!("Tracker link lost");
                self.session.set_link_lost(true);
                self.notifier.notify(TrackerAction::LinkLost);
                vec![]
            }
            TrackerMessage::Disconnected { code } => {
                info!(code, "Tracker disconnected");
                self.session.reset();
                self.notifier.notify(TrackerAction::Disconnected);
                vec![]
            }
            TrackerMessage::TelemetryEvent { event } => {
                info!("EVENT:{}:{}", event.kind, event.seq);
                let ack = Outbound::AckEvent {
                    status: 0,
                    seq: event.seq,
                    date: event.ack_date(),
                };
                self.session.set_last_event(event);
                self.notifier.notify(TrackerAction::Refresh);
                vec![ack]
            }
            TrackerMessage::StoredTelemetryEvent { event } => {
                let count = self.session.record_special_event(event);
                debug!(count, "Stored event received");
                self.notifier.notify(TrackerAction::StoredEvents);
                vec![]
            }
            TrackerMessage::SpnEvent { sequence, event } => {
                debug!(sequence, spn = event.spn, "SPN event received");
                self.session.set_spn_event(sequence, event);
                self.notifier.notify(TrackerAction::Spn);
                vec![Outbound::AckSpnEvent {
                    status: 0,
                    sequence,
                }]
            }
            TrackerMessage::Response { status, response } => {
                if status != 0 {
                    warn!("{}: S={}", response.name(), status);
                    return vec![];
                }
                self.on_response(response)
            }
            TrackerMessage::DashboardUpdated {
                snapshot,
                updated_params,
            } => {
                self.session.apply_dashboard(snapshot, updated_params);
                self.notifier.notify(TrackerAction::Dashboard);
                vec![]
            }
            TrackerMessage::FirmwareUpToDate => self.firmware_update(UpdateAction::UpToDate),
            TrackerMessage::FirmwareUpdateStarted { file } => {
                info!(%file, "Firmware update started");
                self.firmware_update(UpdateAction::Started { file })
            }
            TrackerMessage::FirmwareUpdateProgress { percent } => {
                self.firmware_update(UpdateAction::Progress {
                    percent: percent.min(100),
                })
            }
            TrackerMessage::FirmwareUpdateCompleted => {
                self.firmware_update(UpdateAction::Completed)
            }
            TrackerMessage::FirmwareUpdateFailed { code, cause } => {
                warn!(code, %cause, "Firmware update failed");
                self.firmware_update(UpdateAction::Failed { code, cause })
            }
            TrackerMessage::FirmwareUpdated { info } => {
                info!(version = %info.version_label(), "Firmware updated");
                self.session.set_tracker_info(info);
                self.firmware_update(UpdateAction::Updated)
            }
        }
    }

    /// Decode and apply newline-delimited JSON messages.
    ///
    /// Blank lines and lines starting with `#` are skipped. Decoding stops at
    /// the first invalid line; messages before it have already been applied.
    pub fn replay(&self, input: &str) -> Result<Vec<Outbound>, IngestError> {
        let mut outbound = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let message: TrackerMessage = serde_json::from_str(line)
                .map_err(|source| IngestError::Decode {
                    line: idx + 1,
                    source,
                })?;
            outbound.extend(self.handle(message));
        }
        Ok(outbound)
    }

    fn on_connected(&self) -> Vec<Outbound> {
        let now = Utc::now().timestamp_millis();
        self.session.begin_session(now);
        info!("Tracker connected, syncing");
        self.notifier.notify(TrackerAction::Connected);

        vec![
            Outbound::GetTrackerInfo,
            Outbound::GetStoredEventsCount,
            Outbound::RetrieveStoredEvents,
            Outbound::SetVirtualDashboard { enabled: true },
        ]
    }

    fn on_response(&self, response: TrackerResponse) -> Vec<Outbound> {
        match response {
            TrackerResponse::TrackerInfo { info, vin } => {
                info!(product = %info.product, version = %info.version_label(), "Tracker info");
                let vin_family = info.is_product_family(&self.config.tracker.vin_product_marker);
                // VIN-family trackers that report no VIN clear the identifier
                let vin = vin_family.then(|| vin.unwrap_or_default());
                self.session.apply_tracker_info(info, vin);
                self.notifier.notify(TrackerAction::Tracker);

                let vars = &self.config.system_variables;
                let tag = if vin_family {
                    &vars.periodic_event_tag
                } else {
                    &vars.fallback_tag
                };
                info!("Get Tracker SV:{} ...", tag);
                vec![Outbound::GetSystemVar { tag: tag.clone() }]
            }
            TrackerResponse::VehicleInfo { info } => {
                self.session.set_vehicle_info(info);
                self.notifier.notify(TrackerAction::Vin);
                vec![]
            }
            TrackerResponse::DiagTroubleCodes { dtc } => {
                debug!(codes = dtc.codes.len(), raw = %dtc.raw_hex(), "DTC report");
                self.session.set_diagnostic_code(dtc);
                self.notifier.notify(TrackerAction::Dtc {
                    request: DtcAction::Get,
                });
                vec![]
            }
            TrackerResponse::ClearDiagTroubleCodes => {
                self.notifier.notify(TrackerAction::Dtc {
                    request: DtcAction::Clear,
                });
                vec![]
            }
            TrackerResponse::StoredEventsCount { count } => {
                self.session.set_stored_event_count(count);
                self.notifier.notify(TrackerAction::StoredEvents);
                vec![]
            }
            TrackerResponse::ClearStoredEvents => {
                self.session.set_stored_event_count(0);
                self.notifier.notify(TrackerAction::StoredEvents);
                vec![]
            }
            TrackerResponse::GetSystemVar { tag, value } => {
                if self.config.system_variables.is_tracked(&tag) {
                    debug!("SV: {} = {}", tag, value);
                    self.session.set_system_variable(value);
                    self.notifier.notify(TrackerAction::SystemVariable);
                } else {
                    debug!(%tag, "Ignoring untracked system variable");
                }
                vec![]
            }
            // Stored events arrive individually as StoredTelemetryEvent
            TrackerResponse::RetrieveStoredEvents
            | TrackerResponse::SetSystemVar
            | TrackerResponse::ConfigureSpnEvent => vec![],
        }
    }

    fn firmware_update(&self, action: UpdateAction) -> Vec<Outbound> {
        self.notifier.notify(TrackerAction::Update(action));
        vec![]
    }
}
