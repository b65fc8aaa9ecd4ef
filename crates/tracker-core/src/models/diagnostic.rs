//! Diagnostic trouble code models

use serde::{Deserialize, Serialize};

/// Vehicle bus the trouble codes were read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtcProtocol {
    /// Heavy-duty J1939 bus
    #[default]
    J1939,
    /// Light-duty OBD-II
    Obd2,
}

/// A single trouble code entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroubleCode {
    /// SPN (J1939) or DTC number (OBD-II)
    pub code: u32,
    /// Failure mode identifier (J1939 only)
    #[serde(default)]
    pub fmi: u8,
    /// Occurrence count reported by the ECU
    #[serde(default)]
    pub occurrences: u8,
    /// Source address of the reporting ECU
    #[serde(default)]
    pub source: u8,
}

/// Last diagnostic trouble code report received from the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticTroubleCode {
    pub protocol: DtcProtocol,
    /// Malfunction indicator lamp state
    #[serde(default)]
    pub mil_on: bool,
    #[serde(default)]
    pub codes: Vec<TroubleCode>,
    /// Raw report bytes as sent by the tracker
    #[serde(default, with = "hex_bytes")]
    pub raw: Vec<u8>,
}

impl DiagnosticTroubleCode {
    /// Raw report rendered as uppercase hex
    pub fn raw_hex(&self) -> String {
        hex::encode_upper(&self.raw)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_bytes_from_hex_string() {
        let json = r#"{"protocol":"j1939","mil_on":true,"raw":"0x6e0004"}"#;
        let dtc: DiagnosticTroubleCode = serde_json::from_str(json).unwrap();
        assert_eq!(dtc.raw, vec![0x6E, 0x00, 0x04]);
        assert_eq!(dtc.raw_hex(), "6E0004");
        assert!(dtc.mil_on);
        assert!(dtc.is_empty());
    }

    #[test]
    fn test_invalid_hex_rejected() {
        let json = r#"{"protocol":"obd2","raw":"zz"}"#;
        assert!(serde_json::from_str::<DiagnosticTroubleCode>(json).is_err());
    }
}
