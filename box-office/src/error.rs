//! Errors returned by ledger operations.
//!
//! Every error is returned synchronously to the caller of the operation and
//! none is retried internally. An operation that fails leaves the event
//! exactly as it found it.

use box_office_core::{EventId, Money, Principal, TransferError};
use thiserror::Error;

/// Result alias for ledger operations
pub type SalesResult<T> = Result<T, SalesError>;

/// Ledger operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SalesError {
    /// A non-administrator called an administrator-only operation
    #[error("principal {caller} is not the administrator")]
    Unauthorized {
        /// Who attempted the call
        caller: Principal,
    },

    /// No event was ever created with this id
    #[error("event {0} not found")]
    EventNotFound(EventId),

    /// The event has been settled and no longer sells or settles
    #[error("event {0} is closed")]
    EventClosed(EventId),

    /// Purchases must be for at least one ticket
    #[error("ticket quantity must be greater than zero")]
    InvalidQuantity,

    /// The payment does not cover the tickets
    #[error("insufficient payment: {required} required, {paid} paid")]
    InsufficientPayment {
        /// Price of the requested tickets
        required: Money,
        /// Amount offered
        paid: Money,
    },

    /// Not enough tickets remain
    #[error("insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory {
        /// Tickets requested
        requested: u64,
        /// Tickets remaining
        available: u64,
    },

    /// The buyer holds no tickets for this event
    #[error("principal {buyer} holds no tickets for event {event_id}")]
    NoHoldings {
        /// Event
        event_id: EventId,
        /// Buyer
        buyer: Principal,
    },

    /// The event no longer holds enough funds to pay a refund
    #[error("event balance {held} cannot cover refund of {required}")]
    InsufficientEventBalance {
        /// Refund value
        required: Money,
        /// Funds still held against the event
        held: Money,
    },

    /// The funds transfer failed; nothing was changed
    #[error("funds transfer failed: {reason}")]
    TransferFailed {
        /// Failure reported by the transfer capability
        reason: String,
    },

    /// A quantity or amount computation would overflow
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

impl From<TransferError> for SalesError {
    fn from(error: TransferError) -> Self {
        Self::TransferFailed {
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_becomes_transfer_failed() {
        let error: SalesError = TransferError::Unavailable.into();
        assert_eq!(
            error,
            SalesError::TransferFailed {
                reason: "transfer provider unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_messages_name_the_amounts() {
        let error = SalesError::InsufficientPayment {
            required: Money::from_units(300),
            paid: Money::from_units(250),
        };
        assert_eq!(
            error.to_string(),
            "insufficient payment: 300 units required, 250 units paid"
        );
    }
}
