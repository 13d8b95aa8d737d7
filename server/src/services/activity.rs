//! Activity hub
//!
//! Fans ledger and shop events out to every connected stream client.
//! Publishing never blocks and never fails when nobody is listening.

use crate::config::ACTIVITY_CHANNEL_CAPACITY;
use crate::database::{PointTransaction, PurchaseEntry};
use serde::Serialize;
use tokio::sync::broadcast;

/// Events pushed to activity subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    PointsChanged {
        transaction: PointTransaction,
        balance: i64,
    },
    PurchaseUpdated {
        purchase: PurchaseEntry,
    },
    BadgeEarned {
        code: String,
        name: String,
        icon: String,
    },
}

impl ActivityEvent {
    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            ActivityEvent::PointsChanged { .. } => "points_changed",
            ActivityEvent::PurchaseUpdated { .. } => "purchase_updated",
            ActivityEvent::BadgeEarned { .. } => "badge_earned",
        }
    }
}

#[derive(Clone)]
pub struct ActivityHub {
    sender: broadcast::Sender<ActivityEvent>,
}

impl ActivityHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(ACTIVITY_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ActivityEvent) {
        tracing::debug!("Publishing activity event: {}", event.kind());
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ActivityHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let hub = ActivityHub::new();
        let mut rx = hub.subscribe();

        hub.publish(ActivityEvent::BadgeEarned {
            code: "points_100".to_string(),
            name: "첫 100포인트".to_string(),
            icon: "💰".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind(), "badge_earned");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let hub = ActivityHub::new();
        assert_eq!(hub.subscriber_count(), 0);

        hub.publish(ActivityEvent::BadgeEarned {
            code: "x".to_string(),
            name: "x".to_string(),
            icon: "x".to_string(),
        });
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ActivityEvent::BadgeEarned {
            code: "night_owl".to_string(),
            name: "올빼미".to_string(),
            icon: "🦉".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "badge_earned");
        assert_eq!(json["code"], "night_owl");
    }
}
