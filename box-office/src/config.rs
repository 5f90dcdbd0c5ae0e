//! Configuration management for the box office ledger.
//!
//! Loads configuration from environment variables with sensible defaults.

use box_office_core::{Money, Principal};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// Price of one ticket when nothing else is configured
pub const DEFAULT_TICKET_PRICE: Money = Money::from_units(100);

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sales rules
    pub sales: SalesConfig,
    /// The single principal allowed to create and settle events
    pub administrator: Option<Principal>,
}

/// Sales configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesConfig {
    /// Price of one ticket, the same for every event
    pub ticket_price: Money,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            ticket_price: DEFAULT_TICKET_PRICE,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No administrator was configured
    #[error("BOX_OFFICE_ADMINISTRATOR is not set")]
    MissingAdministrator,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `BOX_OFFICE_TICKET_PRICE`: ticket price in smallest currency units (default 100)
    /// - `BOX_OFFICE_ADMINISTRATOR`: administrator principal as a UUID (no default)
    ///
    /// Unparseable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            sales: SalesConfig {
                ticket_price: lookup("BOX_OFFICE_TICKET_PRICE")
                    .and_then(|s| s.trim().parse().ok())
                    .map_or(DEFAULT_TICKET_PRICE, Money::from_units),
            },
            administrator: lookup("BOX_OFFICE_ADMINISTRATOR")
                .and_then(|s| Uuid::parse_str(s.trim()).ok())
                .map(Principal::from_uuid),
        }
    }

    /// The configured administrator
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAdministrator`] if none is configured.
    pub fn administrator(&self) -> Result<Principal, ConfigError> {
        self.administrator.ok_or(ConfigError::MissingAdministrator)
    }
}
