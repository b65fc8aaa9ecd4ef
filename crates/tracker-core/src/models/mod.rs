//! Record models for facts reported by the tracker

mod dashboard;
mod diagnostic;
mod event;
mod tracker;
mod upgrade;

pub use dashboard::*;
pub use diagnostic::*;
pub use event::*;
pub use tracker::*;
pub use upgrade::*;
