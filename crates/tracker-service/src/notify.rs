//! Change notifications for presentation collaborators
//!
//! Each time ingestion changes session state it publishes a `TrackerAction`
//! naming what changed. Subscribers re-read the store's snapshot to see the
//! new values; the notification carries no state of its own beyond small
//! progress details.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Which diagnostic trouble code request a DTC notification answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtcAction {
    Get,
    Clear,
}

/// Firmware update progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum UpdateAction {
    UpToDate,
    Started { file: String },
    Progress { percent: u32 },
    Completed,
    Updated,
    Failed { code: i32, cause: String },
}

/// What changed in the tracker session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TrackerAction {
    Connected,
    Disconnected,
    LinkLost,
    /// A live telemetry event arrived
    Refresh,
    StoredEvents,
    Spn,
    Tracker,
    Vin,
    Dtc { request: DtcAction },
    SystemVariable,
    Dashboard,
    Update(UpdateAction),
}

/// Publishes `TrackerAction`s to any number of subscribers
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<TrackerAction>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerAction> {
        self.tx.subscribe()
    }

    /// Publish an action; having no subscribers is not an error
    pub fn notify(&self, action: TrackerAction) {
        trace!(?action, receivers = self.tx.receiver_count(), "Notify");
        let _ = self.tx.send(action);
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_without_subscribers() {
        let notifier = Notifier::new(4);
        notifier.notify(TrackerAction::Refresh);
        assert_eq!(notifier.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let notifier = Notifier::new(4);
        let mut rx = notifier.subscribe();
        notifier.notify(TrackerAction::Connected);
        notifier.notify(TrackerAction::Update(UpdateAction::Progress { percent: 40 }));

        assert_eq!(rx.recv().await.unwrap(), TrackerAction::Connected);
        assert_eq!(
            rx.recv().await.unwrap(),
            TrackerAction::Update(UpdateAction::Progress { percent: 40 })
        );
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&TrackerAction::Dtc {
            request: DtcAction::Clear,
        })
        .unwrap();
        assert_eq!(json, r#"{"action":"dtc","request":"clear"}"#);
    }
}
