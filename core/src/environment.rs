//! Environment module - collaborators injected into the ledger
//!
//! The ledger consumes three capabilities it must not implement itself:
//!
//! - [`Clock`]: timestamps for notifications
//! - [`FundsTransfer`]: moves money out of an event's collected balance
//! - [`NotificationSink`]: receives facts about committed operations
//!
//! All of them are object-safe so the ledger can hold them as `Arc<dyn ...>`.

use crate::notification::Notification;
use crate::types::{EventId, Money, Principal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Clock trait - abstracts time operations for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// Funds transfer
// ============================================================================

/// Why money is leaving an event's collected balance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferReason {
    /// Returning the part of a payment above the ticket cost
    Overpayment,
    /// Returning the full value of a buyer's holdings
    Refund,
    /// Paying an event's proceeds to the administrator
    Settlement,
}

impl TransferReason {
    /// Stable lowercase label, used for logs and metric labels
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overpayment => "overpayment",
            Self::Refund => "refund",
            Self::Settlement => "settlement",
        }
    }
}

impl fmt::Display for TransferReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outgoing transfer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Event whose collected balance pays for the transfer
    pub event_id: EventId,
    /// Who receives the money
    pub recipient: Principal,
    /// Amount to move
    pub amount: Money,
    /// Why the money moves
    pub reason: TransferReason,
}

/// Proof of a completed transfer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Identifier assigned by the transfer provider
    pub transaction_id: String,
    /// Amount moved
    pub amount: Money,
}

/// Funds transfer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The recipient or provider refused the transfer
    #[error("transfer rejected: {reason}")]
    Rejected {
        /// Rejection reason reported by the provider
        reason: String,
    },

    /// The provider could not be reached
    #[error("transfer provider unavailable")]
    Unavailable,

    /// Any other failure
    #[error("transfer failed: {0}")]
    Other(String),
}

/// Funds transfer result
pub type TransferResult<T> = Result<T, TransferError>;

/// Boxed future returned by [`FundsTransfer::transfer`]
pub type TransferFuture<'a> = Pin<Box<dyn Future<Output = TransferResult<TransferReceipt>> + Send + 'a>>;

/// Funds transfer capability
///
/// Attempts to move `amount` out of an event's collected balance to
/// `recipient`. The ledger awaits the result exactly once, never retries and
/// never assumes success.
///
/// Implementations must not call back into the ledger for the same event:
/// the ledger holds that event's lock until the transfer resolves.
pub trait FundsTransfer: Send + Sync {
    /// Perform a transfer
    ///
    /// # Errors
    ///
    /// Returns error if the money could not be moved. The ledger rolls back
    /// the operation that requested the transfer.
    fn transfer(&self, request: TransferRequest) -> TransferFuture<'_>;
}

// ============================================================================
// Notifications
// ============================================================================

/// Receives notifications about committed ledger operations
///
/// Publishing is fire-and-forget. The ledger publishes while it still holds
/// the event's lock, so notifications for one event arrive in commit order.
pub trait NotificationSink: Send + Sync {
    /// Publish a notification
    fn publish(&self, notification: &Notification);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_reason_labels() {
        assert_eq!(TransferReason::Overpayment.as_str(), "overpayment");
        assert_eq!(TransferReason::Refund.to_string(), "refund");
        assert_eq!(TransferReason::Settlement.as_str(), "settlement");
    }

    #[test]
    fn test_transfer_error_messages() {
        let rejected = TransferError::Rejected {
            reason: "account frozen".to_string(),
        };
        assert_eq!(rejected.to_string(), "transfer rejected: account frozen");
        assert_eq!(
            TransferError::Unavailable.to_string(),
            "transfer provider unavailable"
        );
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
