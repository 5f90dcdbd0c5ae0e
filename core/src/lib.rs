//! # Box Office Core
//!
//! Value types, notifications and environment traits shared by the box office
//! ledger and its test doubles.
//!
//! ## Core Concepts
//!
//! - **Types**: `EventId`, `Principal` and `Money` value objects
//! - **Notification**: Facts the ledger publishes after a committed operation
//! - **Environment**: Injected collaborators (clock, funds transfer, notification sink)
//!
//! The ledger never moves money or talks to the outside world itself. Every
//! external effect goes through a trait in [`environment`], so production code
//! and tests differ only in what they inject.
//!
//! ## Example
//!
//! ```
//! use box_office_core::{Money, Principal, TransferReason, TransferRequest, EventId};
//!
//! let buyer = Principal::new();
//! let request = TransferRequest {
//!     event_id: EventId::new(0),
//!     recipient: buyer,
//!     amount: Money::from_units(100),
//!     reason: TransferReason::Overpayment,
//! };
//! assert_eq!(request.amount.units(), 100);
//! ```

pub mod environment;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use environment::{
    Clock, FundsTransfer, NotificationSink, SystemClock, TransferError, TransferFuture,
    TransferReason, TransferReceipt, TransferRequest, TransferResult,
};
pub use notification::Notification;
pub use types::{EventId, Money, Principal};
