//! Scripted funds transfer for ledger tests
//!
//! [`ScriptedTransfer`] succeeds by default and can be told to fail the next
//! few calls, every call, or every call for a given [`TransferReason`]. It
//! records every attempt and every completed transfer so tests can assert
//! exactly which money moved.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only happens after a test already panicked

use box_office_core::environment::{
    FundsTransfer, TransferError, TransferFuture, TransferReason, TransferReceipt,
    TransferRequest,
};
use box_office_core::{Money, Principal};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Script {
    fail_all: bool,
    fail_next: usize,
    failing_reasons: HashSet<TransferReason>,
    attempts: Vec<TransferRequest>,
    completed: Vec<TransferRequest>,
}

impl Script {
    fn should_fail(&mut self, request: &TransferRequest) -> bool {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return true;
        }
        self.fail_all || self.failing_reasons.contains(&request.reason)
    }
}

/// Funds transfer double with scriptable failures.
///
/// Clones share the same script and recordings.
///
/// # Example
///
/// ```
/// use box_office_testing::ScriptedTransfer;
///
/// let transfer = ScriptedTransfer::new();
/// transfer.fail_next(1);
/// assert!(transfer.attempts().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransfer {
    script: Arc<RwLock<Script>>,
}

impl ScriptedTransfer {
    /// Create a transfer double that always succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transfer double that always fails
    #[must_use]
    pub fn failing() -> Self {
        let transfer = Self::new();
        transfer.fail_always();
        transfer
    }

    /// Fail the next `count` transfers, whatever their reason
    pub fn fail_next(&self, count: usize) {
        self.script.write().unwrap().fail_next = count;
    }

    /// Fail every transfer until [`Self::succeed_always`] is called
    pub fn fail_always(&self) {
        self.script.write().unwrap().fail_all = true;
    }

    /// Fail every transfer made for `reason`
    pub fn fail_for(&self, reason: TransferReason) {
        self.script.write().unwrap().failing_reasons.insert(reason);
    }

    /// Clear every scripted failure
    pub fn succeed_always(&self) {
        let mut script = self.script.write().unwrap();
        script.fail_all = false;
        script.fail_next = 0;
        script.failing_reasons.clear();
    }

    /// Every transfer attempted, successful or not
    #[must_use]
    pub fn attempts(&self) -> Vec<TransferRequest> {
        self.script.read().unwrap().attempts.clone()
    }

    /// Every transfer that succeeded
    #[must_use]
    pub fn completed(&self) -> Vec<TransferRequest> {
        self.script.read().unwrap().completed.clone()
    }

    /// Total amount successfully paid to `recipient`
    #[must_use]
    pub fn total_paid_to(&self, recipient: Principal) -> Money {
        let units = self
            .script
            .read()
            .unwrap()
            .completed
            .iter()
            .filter(|request| request.recipient == recipient)
            .map(|request| request.amount.units())
            .sum();
        Money::from_units(units)
    }
}

impl FundsTransfer for ScriptedTransfer {
    fn transfer(&self, request: TransferRequest) -> TransferFuture<'_> {
        let outcome = {
            let mut script = self.script.write().unwrap();
            script.attempts.push(request.clone());

            if script.should_fail(&request) {
                Err(TransferError::Rejected {
                    reason: format!("scripted {} failure", request.reason),
                })
            } else {
                script.completed.push(request.clone());
                Ok(TransferReceipt {
                    transaction_id: format!("scripted_txn_{}", script.completed.len()),
                    amount: request.amount,
                })
            }
        };

        Box::pin(async move { outcome })
    }
}
