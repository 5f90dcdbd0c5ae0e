//! Notification sink that writes every notification to the `tracing` log.

use box_office_core::{Notification, NotificationSink};

/// Logs notifications at `info` under the `box_office::notifications` target.
///
/// Useful as the default sink when nothing downstream consumes notifications
/// yet.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing sink
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingSink {
    fn publish(&self, notification: &Notification) {
        match notification {
            Notification::EventCreated {
                event_id,
                tickets_available,
                ..
            } => tracing::info!(
                target: "box_office::notifications",
                %event_id,
                tickets_available,
                "EventCreated"
            ),
            Notification::TicketsPurchased {
                buyer,
                event_id,
                num_tickets,
                ..
            } => tracing::info!(
                target: "box_office::notifications",
                %event_id,
                %buyer,
                num_tickets,
                "TicketsPurchased"
            ),
            Notification::RefundIssued {
                buyer,
                event_id,
                num_tickets,
                ..
            } => tracing::info!(
                target: "box_office::notifications",
                %event_id,
                %buyer,
                num_tickets,
                "RefundIssued"
            ),
            Notification::SaleSettled {
                administrator,
                amount_transferred,
                event_id,
                ..
            } => tracing::info!(
                target: "box_office::notifications",
                %event_id,
                %administrator,
                amount = amount_transferred.units(),
                "SaleSettled"
            ),
        }
    }
}
