//! Telemetry and SPN event models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A telemetry event emitted by the tracker (live or replayed from storage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Event type as reported by the tracker (e.g. "PERIODIC", "IGNITION_ON")
    pub kind: String,
    /// Tracker-assigned sequence number, echoed back in the acknowledgement
    pub seq: u32,
    /// When the tracker recorded the event
    pub timestamp: DateTime<Utc>,
    /// Remaining event fields, kept opaque
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl TelemetryEvent {
    pub fn new(kind: impl Into<String>, seq: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: kind.into(),
            seq,
            timestamp,
            payload: serde_json::Value::Null,
        }
    }

    /// Date string carried in the event acknowledgement
    pub fn ack_date(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// A suspect parameter number (SPN) event configured on the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpnEvent {
    /// J1939 suspect parameter number
    pub spn: u32,
    /// Reported value
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ack_date_is_second_precision_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let event = TelemetryEvent::new("PERIODIC", 42, ts);
        assert_eq!(event.ack_date(), "2024-03-09T14:05:07Z");
    }

    #[test]
    fn test_event_without_payload_deserializes() {
        let json = r#"{"kind":"IGNITION_ON","seq":7,"timestamp":"2024-01-01T00:00:00Z"}"#;
        let event: TelemetryEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.seq, 7);
        assert!(event.payload.is_null());
    }
}
