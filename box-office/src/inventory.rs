//! Per-event ticket counters.
//!
//! **Boundary policy**: a purchase is accepted while `quantity <= remaining`,
//! so the last remaining ticket can always be sold. Only `quantity >
//! remaining` is rejected.

use crate::error::{SalesError, SalesResult};
use serde::{Deserialize, Serialize};

/// Ticket capacity and sales count for one event.
///
/// `sold <= total` holds for every value this type can reach: the only
/// mutators are checked and leave the counters untouched on failure, and
/// deserialization rejects documents with `sold > total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInventory")]
pub struct Inventory {
    total: u64,
    sold: u64,
}

/// Unchecked wire form of [`Inventory`]
#[derive(Deserialize)]
struct RawInventory {
    total: u64,
    sold: u64,
}

impl TryFrom<RawInventory> for Inventory {
    type Error = String;

    fn try_from(raw: RawInventory) -> Result<Self, Self::Error> {
        if raw.sold > raw.total {
            Err(format!(
                "inventory sold count {} exceeds total {}",
                raw.sold, raw.total
            ))
        } else {
            Ok(Self {
                total: raw.total,
                sold: raw.sold,
            })
        }
    }
}

impl Inventory {
    /// Creates an inventory with nothing sold
    #[must_use]
    pub const fn new(total: u64) -> Self {
        Self { total, sold: 0 }
    }

    /// Fixed capacity
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Tickets currently sold
    #[must_use]
    pub const fn sold(&self) -> u64 {
        self.sold
    }

    /// Tickets still available
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.total - self.sold
    }

    /// Whether `quantity` more tickets fit
    #[must_use]
    pub const fn can_sell(&self, quantity: u64) -> bool {
        quantity <= self.remaining()
    }

    /// Returns the `sold` count after selling `quantity` more tickets
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::InsufficientInventory`] if the sale would push
    /// `sold` above `total`.
    pub fn sold_after_sale(&self, quantity: u64) -> SalesResult<u64> {
        if self.can_sell(quantity) {
            Ok(self.sold + quantity)
        } else {
            Err(SalesError::InsufficientInventory {
                requested: quantity,
                available: self.remaining(),
            })
        }
    }

    /// Returns the `sold` count after `quantity` tickets come back
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::ArithmeticOverflow`] if more tickets would come
    /// back than were sold.
    pub fn sold_after_refund(&self, quantity: u64) -> SalesResult<u64> {
        match self.sold.checked_sub(quantity) {
            Some(sold) => Ok(sold),
            None => Err(SalesError::ArithmeticOverflow),
        }
    }

    /// Record a sale of `quantity` tickets
    ///
    /// # Errors
    ///
    /// Same as [`Self::sold_after_sale`]; nothing changes on error.
    pub fn record_sale(&mut self, quantity: u64) -> SalesResult<()> {
        self.sold = self.sold_after_sale(quantity)?;
        Ok(())
    }

    /// Record `quantity` tickets coming back
    ///
    /// # Errors
    ///
    /// Same as [`Self::sold_after_refund`]; nothing changes on error.
    pub fn record_refund(&mut self, quantity: u64) -> SalesResult<()> {
        self.sold = self.sold_after_refund(quantity)?;
        Ok(())
    }
}
