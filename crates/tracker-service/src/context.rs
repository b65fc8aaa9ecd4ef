//! Application context owning the single session store

use std::sync::Arc;

use tokio::sync::broadcast;
use tracker_core::{SessionState, SessionStore};

use crate::config::TrackerConfig;
use crate::ingest::TrackerEvents;
use crate::logging::{Logger, TracingLogger};
use crate::notify::{Notifier, TrackerAction};

/// Wires the session store to its collaborators.
///
/// Construct one per running application and hand out clones of the
/// `Arc<SessionStore>`; there is no process-global instance.
pub struct TrackerContext {
    session: Arc<SessionStore>,
    notifier: Notifier,
    events: TrackerEvents,
    logger: Arc<dyn Logger>,
}

impl TrackerContext {
    pub fn new(config: TrackerConfig) -> Self {
        let session = Arc::new(SessionStore::new());
        let notifier = Notifier::new(config.notifications.capacity);
        let events = TrackerEvents::new(session.clone(), notifier.clone(), config);
        Self {
            session,
            notifier,
            events,
            logger: Arc::new(TracingLogger),
        }
    }

    /// The shared session store; always the same instance
    pub fn session(&self) -> Arc<SessionStore> {
        self.session.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.session.current_snapshot()
    }

    /// Ingestion entry point for the tracker SDK
    pub fn events(&self) -> &TrackerEvents {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerAction> {
        self.notifier.subscribe()
    }

    /// Logger to hand to the tracker SDK
    pub fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }

    /// End the current session from the presentation side
    pub fn end_session(&self) {
        self.session.reset();
        self.notifier.notify(TrackerAction::Disconnected);
    }
}

impl Default for TrackerContext {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
