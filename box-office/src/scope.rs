//! Operations bound to a single event.

use crate::catalog::EventView;
use crate::engine::{PurchaseReceipt, RefundReceipt, Settlement, TicketSalesEngine};
use crate::error::SalesResult;
use box_office_core::{EventId, Money, Principal};

/// An engine narrowed to one event, obtained from [`TicketSalesEngine::scope`].
///
/// Each call forwards to the engine with the bound id, so the same
/// validation, locking and rollback rules apply.
#[derive(Clone, Copy, Debug)]
pub struct EventSales<'a> {
    engine: &'a TicketSalesEngine,
    event_id: EventId,
}

impl<'a> EventSales<'a> {
    pub(crate) const fn new(engine: &'a TicketSalesEngine, event_id: EventId) -> Self {
        Self { engine, event_id }
    }

    /// The bound event
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// See [`TicketSalesEngine::purchase`]
    ///
    /// # Errors
    ///
    /// Same as [`TicketSalesEngine::purchase`].
    pub async fn purchase(
        &self,
        buyer: Principal,
        quantity: u64,
        paid: Money,
    ) -> SalesResult<PurchaseReceipt> {
        self.engine
            .purchase(self.event_id, buyer, quantity, paid)
            .await
    }

    /// See [`TicketSalesEngine::refund`]
    ///
    /// # Errors
    ///
    /// Same as [`TicketSalesEngine::refund`].
    pub async fn refund(&self, buyer: Principal) -> SalesResult<RefundReceipt> {
        self.engine.refund(self.event_id, buyer).await
    }

    /// See [`TicketSalesEngine::settle`]
    ///
    /// # Errors
    ///
    /// Same as [`TicketSalesEngine::settle`].
    pub async fn settle(&self, caller: Principal) -> SalesResult<Settlement> {
        self.engine.settle(self.event_id, caller).await
    }

    /// Current view of the event
    ///
    /// # Errors
    ///
    /// Never fails for a scope obtained from the engine; ids are never removed.
    pub async fn view(&self) -> SalesResult<EventView> {
        self.engine.get_event(self.event_id).await
    }

    /// Tickets `buyer` holds for the event
    ///
    /// # Errors
    ///
    /// Never fails for a scope obtained from the engine; ids are never removed.
    pub async fn holdings(&self, buyer: Principal) -> SalesResult<u64> {
        self.engine.buyer_ticket_count(self.event_id, buyer).await
    }
}
