//! Per-event buyer holdings.

use crate::error::{SalesError, SalesResult};
use box_office_core::Principal;
use std::collections::HashMap;

/// Tickets held by each buyer of one event.
///
/// Buyers with zero tickets have no entry, so [`Self::buyer_count`] only
/// counts current holders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuyerRegistry {
    holdings: HashMap<Principal, u64>,
}

impl BuyerRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets held by `buyer`, 0 for unseen buyers
    #[must_use]
    pub fn holdings_of(&self, buyer: &Principal) -> u64 {
        self.holdings.get(buyer).copied().unwrap_or(0)
    }

    /// Add `quantity` tickets to `buyer`'s holdings and return the new total
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::ArithmeticOverflow`] if the holdings would
    /// overflow; the registry is left unchanged.
    pub fn credit(&mut self, buyer: Principal, quantity: u64) -> SalesResult<u64> {
        let held = self
            .holdings_of(&buyer)
            .checked_add(quantity)
            .ok_or(SalesError::ArithmeticOverflow)?;
        self.restore(buyer, held);
        Ok(held)
    }

    /// Reset `buyer`'s holdings to zero, returning what they held
    pub fn clear(&mut self, buyer: &Principal) -> u64 {
        self.holdings.remove(buyer).unwrap_or(0)
    }

    /// Number of buyers currently holding tickets
    #[must_use]
    pub fn buyer_count(&self) -> usize {
        self.holdings.len()
    }

    /// Sum of all holdings
    #[must_use]
    pub fn total_held(&self) -> u64 {
        self.holdings.values().sum()
    }

    /// Put `buyer`'s holdings back to a previously observed value
    pub(crate) fn restore(&mut self, buyer: Principal, held: u64) {
        if held == 0 {
            self.holdings.remove(&buyer);
        } else {
            self.holdings.insert(buyer, held);
        }
    }
}
