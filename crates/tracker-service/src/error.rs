//! Error types for the tracker service

use thiserror::Error;

/// Errors loading the service configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Log filter directive is malformed
    #[error("Invalid log filter '{0}'")]
    InvalidLogFilter(String),
}

/// Errors decoding inbound tracker messages
#[derive(Debug, Error)]
pub enum IngestError {
    /// A replay line is not a valid tracker message
    #[error("Invalid tracker message on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
