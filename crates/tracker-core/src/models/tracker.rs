//! Tracker hardware and vehicle identity models

use serde::{Deserialize, Serialize};

/// Connected tracker hardware description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerInfo {
    /// Product name (e.g. "PT30", "PT40")
    pub product: String,
    pub serial_number: String,
    /// Main firmware version
    pub firmware_version: String,
    /// Radio (BLE) firmware version
    #[serde(default)]
    pub radio_version: String,
}

impl TrackerInfo {
    /// Whether the product name contains the given family marker
    pub fn is_product_family(&self, marker: &str) -> bool {
        self.product.contains(marker)
    }

    /// Short version label for display
    pub fn version_label(&self) -> String {
        format!("F/W:{}  BLE:{}", self.firmware_version, self.radio_version)
    }
}

/// Vehicle description reported by the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub vin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}
