//! tracker-core - Session state for a connected telemetry tracker
//!
//! This crate holds the latest-known facts of a single tracker session
//! (identity, last events, last diagnostic code, link status, dashboard
//! bindings) behind one lock, so that ingestion and presentation code can
//! share it without ever observing a half-applied update.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 SessionStore                  │
//! │                                               │
//! │   RwLock<SessionState>                        │
//! │     ├── install scope: privacy_accepted       │
//! │     └── session scope: events, DTC, info, ... │
//! │                                               │
//! │   setters / reset()  ──► write lock           │
//! │   current_snapshot() ──► read lock + clone    │
//! └───────────────────────────────────────────────┘
//! ```

pub mod models;
pub mod session;

pub use models::*;
pub use session::{SessionState, SessionStore, UNKNOWN};
