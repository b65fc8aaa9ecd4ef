//! Tracker service configuration
//!
//! Loaded from TOML. Every section is optional; missing values fall back to
//! the defaults of the PT30/PT40 tracker families.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub tracker: TrackerProductConfig,
    #[serde(default)]
    pub system_variables: SystemVariableConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl TrackerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directives, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "trackerd=info,tracker_service=info,tracker_core=info".to_string()
}

/// Product-specific behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerProductConfig {
    /// Product name marker of trackers that report the VIN in their info response
    #[serde(default = "default_vin_product_marker")]
    pub vin_product_marker: String,
}

impl Default for TrackerProductConfig {
    fn default() -> Self {
        Self {
            vin_product_marker: default_vin_product_marker(),
        }
    }
}

fn default_vin_product_marker() -> String {
    "30".to_string()
}

/// System variable tags tracked in session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemVariableConfig {
    /// Periodic event gap, queried on VIN-reporting products
    #[serde(default = "default_periodic_event_tag")]
    pub periodic_event_tag: String,
    /// Tag queried on every other product
    #[serde(default = "default_fallback_tag")]
    pub fallback_tag: String,
}

impl Default for SystemVariableConfig {
    fn default() -> Self {
        Self {
            periodic_event_tag: default_periodic_event_tag(),
            fallback_tag: default_fallback_tag(),
        }
    }
}

impl SystemVariableConfig {
    pub fn is_tracked(&self, tag: &str) -> bool {
        !tag.is_empty() && (tag == self.periodic_event_tag || tag == self.fallback_tag)
    }
}

fn default_periodic_event_tag() -> String {
    "PE".to_string()
}

fn default_fallback_tag() -> String {
    "HUC".to_string()
}

/// Change notification channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Broadcast channel capacity; slow subscribers lag past this
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    64
}
