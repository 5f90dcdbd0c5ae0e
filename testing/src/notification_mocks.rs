//! In-memory notification sink

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use box_office_core::environment::NotificationSink;
use box_office_core::{EventId, Notification};
use std::sync::{Arc, RwLock};

/// Notification sink that keeps everything it receives, in order.
///
/// Clones share the same recording.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    published: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.published.read().unwrap().clone()
    }

    /// Notifications for one event, in publish order
    #[must_use]
    pub fn for_event(&self, event_id: EventId) -> Vec<Notification> {
        self.published
            .read()
            .unwrap()
            .iter()
            .filter(|n| n.event_id() == event_id)
            .cloned()
            .collect()
    }

    /// Variant names in publish order
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.published
            .read()
            .unwrap()
            .iter()
            .map(Notification::event_type)
            .collect()
    }

    /// Number of notifications received
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.read().unwrap().len()
    }

    /// Whether nothing was published
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.read().unwrap().is_empty()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.published.write().unwrap().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn publish(&self, notification: &Notification) {
        self.published.write().unwrap().push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use box_office_core::Principal;
    use chrono::Utc;

    #[test]
    fn test_records_in_order_and_filters_by_event() {
        let sink = RecordingSink::new();
        let buyer = Principal::new();

        sink.publish(&Notification::TicketsPurchased {
            buyer,
            event_id: EventId::new(0),
            num_tickets: 1,
            occurred_at: Utc::now(),
        });
        sink.publish(&Notification::RefundIssued {
            buyer,
            event_id: EventId::new(1),
            num_tickets: 1,
            occurred_at: Utc::now(),
        });

        assert_eq!(sink.event_types(), vec!["TicketsPurchased", "RefundIssued"]);
        assert_eq!(sink.for_event(EventId::new(1)).len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }
}
