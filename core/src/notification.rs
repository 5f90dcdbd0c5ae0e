//! Notifications published after committed ledger operations.
//!
//! Each variant records a fact, never an intent. A notification is only
//! published once the operation's state changes (and any transfer it needed)
//! have been committed.

use crate::types::{EventId, Money, Principal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Facts published by the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    /// A new event was added to the catalog
    EventCreated {
        /// Display description
        description: String,
        /// Display website
        website: String,
        /// Tickets on sale (the full capacity at creation)
        tickets_available: u64,
        /// Assigned event id
        event_id: EventId,
        /// When the event was created
        occurred_at: DateTime<Utc>,
    },

    /// A buyer purchased tickets
    TicketsPurchased {
        /// Buyer
        buyer: Principal,
        /// Event
        event_id: EventId,
        /// Number of tickets bought in this purchase
        num_tickets: u64,
        /// When the purchase committed
        occurred_at: DateTime<Utc>,
    },

    /// A buyer returned all their tickets for an event
    RefundIssued {
        /// Buyer
        buyer: Principal,
        /// Event
        event_id: EventId,
        /// Number of tickets returned
        num_tickets: u64,
        /// When the refund committed
        occurred_at: DateTime<Utc>,
    },

    /// An event was closed and its proceeds paid out
    SaleSettled {
        /// Administrator who received the proceeds
        administrator: Principal,
        /// Amount paid out
        amount_transferred: Money,
        /// Event
        event_id: EventId,
        /// When the settlement committed
        occurred_at: DateTime<Utc>,
    },
}

impl Notification {
    /// Event this notification concerns
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::TicketsPurchased { event_id, .. }
            | Self::RefundIssued { event_id, .. }
            | Self::SaleSettled { event_id, .. } => *event_id,
        }
    }

    /// Variant name
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "EventCreated",
            Self::TicketsPurchased { .. } => "TicketsPurchased",
            Self::RefundIssued { .. } => "RefundIssued",
            Self::SaleSettled { .. } => "SaleSettled",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_accessors() {
        let buyer = Principal::new();
        let notification = Notification::RefundIssued {
            buyer,
            event_id: EventId::new(3),
            num_tickets: 2,
            occurred_at: Utc::now(),
        };

        assert_eq!(notification.event_id(), EventId::new(3));
        assert_eq!(notification.event_type(), "RefundIssued");
    }

    #[test]
    fn test_notification_is_tagged_by_type() {
        let notification = Notification::SaleSettled {
            administrator: Principal::new(),
            amount_transferred: Money::from_units(300),
            event_id: EventId::new(0),
            occurred_at: Utc::now(),
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "SaleSettled");
        assert_eq!(json["amount_transferred"], 300);
        assert_eq!(json["event_id"], 0);

        let decoded: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, notification);
    }
}
