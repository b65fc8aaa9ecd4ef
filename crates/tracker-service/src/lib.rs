//! tracker-service - Ingestion and notification around the tracker session
//!
//! # Architecture
//!
//! ```text
//! tracker SDK ──TrackerMessage──► TrackerEvents ──setters──► SessionStore
//!      ▲                              │                          │
//!      └──────────Outbound────────────┤                          │ current_snapshot()
//!                                     ▼                          ▼
//!                                 Notifier ──TrackerAction──► presentation
//! ```
//!
//! `TrackerContext` constructs the single `SessionStore` and wires the
//! pieces together.

pub mod config;
pub mod context;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod notify;

pub use config::TrackerConfig;
pub use context::TrackerContext;
pub use error::{ConfigError, IngestError};
pub use ingest::{Outbound, TrackerEvents, TrackerMessage, TrackerResponse};
pub use logging::{init_logging, Logger, Severity, TracingLogger};
pub use notify::{DtcAction, Notifier, TrackerAction, UpdateAction};

// Re-export core types for convenience
pub use tracker_core::{SessionState, SessionStore, UNKNOWN};
