//! Value objects for the box office ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a ticketed event.
///
/// Ids are assigned sequentially by the catalog starting at 0 and are never
/// reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// Creates an `EventId` from its raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw id value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An already-authenticated caller identity.
///
/// The ledger treats principals as opaque: it only compares them against the
/// configured administrator and uses them to key holdings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(Uuid);

impl Principal {
    /// Creates a new random `Principal`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `Principal` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (smallest currency unit, never wraps)
// ============================================================================

/// An amount of money in the smallest currency unit.
///
/// All arithmetic is checked. Callers turn `None` into an overflow error
/// rather than wrapping.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(u64);

impl Money {
    /// Zero units
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from smallest currency units
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Returns the amount in smallest currency units
    #[must_use]
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Subtracts two money amounts (returns None if result would be negative)
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a ticket quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u64) -> Option<Self> {
        match self.0.checked_mul(quantity) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_checked_arithmetic() {
        let price = Money::from_units(100);

        assert_eq!(price.checked_multiply(3), Some(Money::from_units(300)));
        assert_eq!(price.checked_add(Money::from_units(5)), Some(Money::from_units(105)));
        assert_eq!(price.checked_sub(Money::from_units(100)), Some(Money::ZERO));
        assert_eq!(price.checked_sub(Money::from_units(101)), None);
    }

    #[test]
    fn test_money_overflow_fails_closed() {
        let price = Money::from_units(100);

        assert_eq!(price.checked_multiply(u64::MAX), None);
        assert_eq!(Money::from_units(u64::MAX).checked_add(Money::from_units(1)), None);
    }

    #[test]
    fn test_event_id_display() {
        assert_eq!(EventId::new(7).to_string(), "7");
        assert_eq!(EventId::new(7).value(), 7);
    }

    #[test]
    fn test_principals_are_distinct() {
        let a = Principal::new();
        let b = Principal::new();
        assert_ne!(a, b);
        assert_eq!(Principal::from_uuid(*a.as_uuid()), a);
    }
}
