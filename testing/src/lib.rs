//! # Box Office Testing
//!
//! Testing utilities and helpers for the box office ledger.
//!
//! This crate provides:
//! - Mock implementations of the environment traits
//! - Test helpers (tracing bootstrap)
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use box_office_testing::{RecordingSink, ScriptedTransfer, test_clock};
//!
//! #[tokio::test]
//! async fn test_overpayment_is_returned() {
//!     let transfer = ScriptedTransfer::new();
//!     let sink = RecordingSink::new();
//!     let engine = build_engine(&transfer, &sink);
//!
//!     engine.purchase(event_id, buyer, 2, Money::from_units(300)).await?;
//!
//!     assert_eq!(transfer.completed().len(), 1);
//!     assert_eq!(sink.len(), 2);
//! }
//! ```

use box_office_core::environment::Clock;
use chrono::{DateTime, Utc};

pub mod notification_mocks;
pub mod transfer_mocks;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use box_office_testing::mocks::FixedClock;
    /// use box_office_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a test-writer tracing subscriber honouring `RUST_LOG`.
    ///
    /// Safe to call from every test; only the first call installs anything.
    pub fn init_test_tracing() {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "box_office=debug".into()),
            )
            .with_test_writer()
            .try_init()
            .ok();
    }
}

/// Property-based testing strategies for ledger inputs.
pub mod properties {
    use box_office_core::Money;
    use proptest::prelude::*;

    /// Event capacities, including sold-out-at-creation events
    pub fn capacity() -> impl Strategy<Value = u64> {
        0u64..=20
    }

    /// Ticket quantities for a single purchase (zero included to hit the rejection path)
    pub fn quantity() -> impl Strategy<Value = u64> {
        0u64..=6
    }

    /// Amount paid on top of (or below, when negative) the exact cost
    pub fn payment_delta() -> impl Strategy<Value = i64> {
        -150i64..=250
    }

    /// Apply a payment delta to an exact cost, clamping at zero
    #[must_use]
    pub fn adjust_payment(cost: Money, delta: i64) -> Money {
        let units = if delta.is_negative() {
            cost.units().saturating_sub(delta.unsigned_abs())
        } else {
            cost.units().saturating_add(delta.unsigned_abs())
        };
        Money::from_units(units)
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FixedClock, test_clock};
pub use notification_mocks::RecordingSink;
pub use transfer_mocks::ScriptedTransfer;
