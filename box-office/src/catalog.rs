//! Event catalog: owns every event record and hands out per-event locks.
//!
//! Records live behind their own `tokio::sync::Mutex` so operations on one
//! event serialize while different events proceed in parallel. The catalog's
//! `RwLock` is only held long enough to look up or append a record handle.

use crate::error::{SalesError, SalesResult};
use crate::inventory::Inventory;
use crate::registry::BuyerRegistry;
use box_office_core::{EventId, Money, Principal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Shared handle to one event record
pub type EventHandle = Arc<Mutex<EventRecord>>;

// ============================================================================
// Event record
// ============================================================================

/// Everything the ledger knows about one event.
///
/// Only the engine mutates a record, and only while holding its lock.
#[derive(Clone, Debug)]
pub struct EventRecord {
    pub(crate) id: EventId,
    pub(crate) description: String,
    pub(crate) website: String,
    pub(crate) inventory: Inventory,
    pub(crate) registry: BuyerRegistry,
    pub(crate) is_open: bool,
    pub(crate) balance: Money,
}

impl EventRecord {
    fn new(id: EventId, description: String, website: String, total_tickets: u64) -> Self {
        Self {
            id,
            description,
            website,
            inventory: Inventory::new(total_tickets),
            registry: BuyerRegistry::new(),
            is_open: true,
            balance: Money::ZERO,
        }
    }

    /// Event id
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Ticket counters
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Buyer holdings
    #[must_use]
    pub const fn registry(&self) -> &BuyerRegistry {
        &self.registry
    }

    /// Whether tickets are still on sale
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Funds currently held against the event
    #[must_use]
    pub const fn balance(&self) -> Money {
        self.balance
    }

    /// Read-only snapshot
    #[must_use]
    pub fn view(&self) -> EventView {
        EventView {
            id: self.id,
            description: self.description.clone(),
            website: self.website.clone(),
            total_tickets: self.inventory.total(),
            tickets_available: self.inventory.remaining(),
            sold: self.inventory.sold(),
            is_open: self.is_open,
            balance: self.balance,
            buyers: self.registry.buyer_count(),
        }
    }

    /// Credit `quantity` tickets costing `cost` to `buyer`.
    ///
    /// Applies all three changes or none of them.
    pub(crate) fn apply_sale(
        &mut self,
        buyer: Principal,
        quantity: u64,
        cost: Money,
    ) -> SalesResult<()> {
        let balance = self
            .balance
            .checked_add(cost)
            .ok_or(SalesError::ArithmeticOverflow)?;
        let mut inventory = self.inventory;
        inventory.record_sale(quantity)?;
        self.registry.credit(buyer, quantity)?;

        self.inventory = inventory;
        self.balance = balance;
        Ok(())
    }

    /// Take back every ticket `buyer` holds, worth `value`, and return the count.
    ///
    /// Applies all three changes or none of them.
    pub(crate) fn apply_refund(&mut self, buyer: &Principal, value: Money) -> SalesResult<u64> {
        let balance = self
            .balance
            .checked_sub(value)
            .ok_or(SalesError::InsufficientEventBalance {
                required: value,
                held: self.balance,
            })?;
        let mut inventory = self.inventory;
        inventory.record_refund(self.registry.holdings_of(buyer))?;

        let cleared = self.registry.clear(buyer);
        self.inventory = inventory;
        self.balance = balance;
        Ok(cleared)
    }

    /// Mark the event closed; its balance has been paid out
    pub(crate) fn close(&mut self) {
        self.is_open = false;
        self.balance = Money::ZERO;
    }

    /// Capture what a purchase or refund by `buyer` may change
    pub(crate) fn checkpoint(&self, buyer: Principal) -> Checkpoint {
        Checkpoint {
            buyer,
            held: self.registry.holdings_of(&buyer),
            inventory: self.inventory,
            balance: self.balance,
        }
    }

    /// Undo everything since `checkpoint` was taken
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.registry.restore(checkpoint.buyer, checkpoint.held);
        self.inventory = checkpoint.inventory;
        self.balance = checkpoint.balance;
    }
}

/// Pre-operation state of the parts of a record one buyer's operation touches
#[derive(Clone, Copy, Debug)]
pub(crate) struct Checkpoint {
    buyer: Principal,
    held: u64,
    inventory: Inventory,
    balance: Money,
}

/// Read-only view of an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    /// Event id
    pub id: EventId,
    /// Display description
    pub description: String,
    /// Display website
    pub website: String,
    /// Fixed capacity
    pub total_tickets: u64,
    /// `total_tickets - sold`
    pub tickets_available: u64,
    /// Tickets sold and not refunded
    pub sold: u64,
    /// Whether tickets are still on sale
    pub is_open: bool,
    /// Funds currently held against the event
    pub balance: Money,
    /// Buyers currently holding tickets
    pub buyers: usize,
}

// ============================================================================
// Catalog
// ============================================================================

/// Owner of all event records
#[derive(Debug, Default)]
pub struct EventCatalog {
    events: RwLock<Vec<EventHandle>>,
}

impl EventCatalog {
    /// Creates an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event and return it already locked.
    ///
    /// The caller keeps the lock while it announces the event, so nothing can
    /// be published for the new id before its creation.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::ArithmeticOverflow`] if the id space is exhausted.
    pub async fn create(
        &self,
        description: String,
        website: String,
        total_tickets: u64,
    ) -> SalesResult<OwnedMutexGuard<EventRecord>> {
        let mut events = self.events.write().await;
        let id = u64::try_from(events.len())
            .map(EventId::new)
            .map_err(|_| SalesError::ArithmeticOverflow)?;

        let handle = Arc::new(Mutex::new(EventRecord::new(
            id,
            description,
            website,
            total_tickets,
        )));
        let guard = Arc::clone(&handle).lock_owned().await;
        events.push(handle);
        Ok(guard)
    }

    /// Look up an event; `None` if the id was never assigned
    pub async fn get(&self, event_id: EventId) -> Option<EventHandle> {
        let index = usize::try_from(event_id.value()).ok()?;
        self.events.read().await.get(index).cloned()
    }

    /// Number of events ever created
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether no event was created yet
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Handles to every event, in id order
    pub async fn handles(&self) -> Vec<EventHandle> {
        self.events.read().await.clone()
    }
}
