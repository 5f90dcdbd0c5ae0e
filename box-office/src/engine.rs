//! Ticket sales engine: purchase, refund and settlement over the catalog.
//!
//! Every mutating operation follows the same shape:
//!
//! ```text
//! lock event ─► validate ─► apply (checkpoint kept) ─► transfer?
//!                                                        │
//!                              ┌── ok ───────────────────┤
//!                              ▼                         ▼ err
//!                       publish notification      restore checkpoint
//!                       unlock                    unlock, TransferFailed
//! ```
//!
//! The event lock is held across the transfer, so no other call on the same
//! event can observe an operation whose transfer has not resolved yet.

use crate::catalog::{EventCatalog, EventHandle, EventView};
use crate::config::{Config, ConfigError, SalesConfig};
use crate::error::{SalesError, SalesResult};
use crate::metrics;
use crate::scope::EventSales;
use box_office_core::{
    Clock, EventId, FundsTransfer, Money, Notification, NotificationSink, Principal,
    TransferReason, TransferReceipt, TransferRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Environment
// ============================================================================

/// Collaborators the engine consumes
#[derive(Clone)]
pub struct SalesEnvironment {
    /// Clock for notification timestamps
    pub clock: Arc<dyn Clock>,
    /// Moves money out of an event's collected balance
    pub transfer: Arc<dyn FundsTransfer>,
    /// Receives notifications about committed operations
    pub notifier: Arc<dyn NotificationSink>,
}

impl SalesEnvironment {
    /// Creates a new `SalesEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        transfer: Arc<dyn FundsTransfer>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            clock,
            transfer,
            notifier,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of a committed purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Event
    pub event_id: EventId,
    /// Buyer
    pub buyer: Principal,
    /// Tickets bought
    pub quantity: u64,
    /// Price of the tickets, kept by the event
    pub cost: Money,
    /// Part of the payment returned to the buyer
    pub overpayment_returned: Money,
    /// Receipt of the overpayment transfer, if one was needed
    pub transfer: Option<TransferReceipt>,
    /// Tickets left after this purchase
    pub tickets_remaining: u64,
}

/// Outcome of a committed refund
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundReceipt {
    /// Event
    pub event_id: EventId,
    /// Buyer
    pub buyer: Principal,
    /// Tickets returned
    pub quantity: u64,
    /// Money returned to the buyer
    pub amount: Money,
    /// Receipt of the refund transfer
    pub transfer: TransferReceipt,
}

/// Outcome of a committed settlement
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Event
    pub event_id: EventId,
    /// Recipient of the proceeds
    pub administrator: Principal,
    /// Proceeds paid out
    pub amount: Money,
    /// Receipt of the payout, absent when there was nothing to pay
    pub transfer: Option<TransferReceipt>,
}

// ============================================================================
// Engine
// ============================================================================

/// Orchestrates purchases, refunds and settlements across all events.
///
/// Share it as `Arc<TicketSalesEngine>`; every method takes `&self`.
pub struct TicketSalesEngine {
    administrator: Principal,
    config: SalesConfig,
    catalog: EventCatalog,
    env: SalesEnvironment,
}

impl TicketSalesEngine {
    /// Creates an engine with no events
    #[must_use]
    pub fn new(administrator: Principal, config: SalesConfig, env: SalesEnvironment) -> Self {
        Self {
            administrator,
            config,
            catalog: EventCatalog::new(),
            env,
        }
    }

    /// Creates an engine from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAdministrator`] if the configuration
    /// names no administrator.
    pub fn from_config(config: &Config, env: SalesEnvironment) -> Result<Self, ConfigError> {
        Ok(Self::new(config.administrator()?, config.sales, env))
    }

    /// The administrator principal
    #[must_use]
    pub const fn administrator(&self) -> Principal {
        self.administrator
    }

    /// Price of one ticket
    #[must_use]
    pub const fn ticket_price(&self) -> Money {
        self.config.ticket_price
    }

    // ========== Catalog ==========

    /// Add an event with `total_tickets` on sale.
    ///
    /// # Errors
    ///
    /// - [`SalesError::Unauthorized`]: caller is not the administrator
    /// - [`SalesError::ArithmeticOverflow`]: the id space is exhausted
    #[tracing::instrument(skip_all, fields(%caller, total_tickets = total_tickets))]
    pub async fn create_event(
        &self,
        caller: Principal,
        description: impl Into<String>,
        website: impl Into<String>,
        total_tickets: u64,
    ) -> SalesResult<EventId> {
        self.require_administrator(caller)?;

        let record = self
            .catalog
            .create(description.into(), website.into(), total_tickets)
            .await?;
        let event_id = record.id();

        self.env.notifier.publish(&Notification::EventCreated {
            description: record.description.clone(),
            website: record.website.clone(),
            tickets_available: record.inventory().remaining(),
            event_id,
            occurred_at: self.env.clock.now(),
        });
        metrics::record_event_created();
        metrics::update_tickets_available(event_id, record.inventory().remaining());

        tracing::info!(%event_id, "Event created");
        Ok(event_id)
    }

    /// Read-only view of an event
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::EventNotFound`] for ids never created.
    pub async fn get_event(&self, event_id: EventId) -> SalesResult<EventView> {
        let handle = self.lookup(event_id).await?;
        let view = handle.lock().await.view();
        Ok(view)
    }

    /// Tickets `buyer` holds for an event
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::EventNotFound`] for ids never created.
    pub async fn buyer_ticket_count(&self, event_id: EventId, buyer: Principal) -> SalesResult<u64> {
        let handle = self.lookup(event_id).await?;
        let held = handle.lock().await.registry().holdings_of(&buyer);
        Ok(held)
    }

    /// Views of every event, in id order
    pub async fn events(&self) -> Vec<EventView> {
        let mut views = Vec::new();
        for handle in self.catalog.handles().await {
            views.push(handle.lock().await.view());
        }
        views
    }

    /// Number of events ever created
    pub async fn event_count(&self) -> usize {
        self.catalog.len().await
    }

    /// Operations bound to a single event
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::EventNotFound`] for ids never created.
    pub async fn scope(&self, event_id: EventId) -> SalesResult<EventSales<'_>> {
        self.lookup(event_id).await?;
        Ok(EventSales::new(self, event_id))
    }

    // ========== Sales ==========

    /// Buy `quantity` tickets paying `paid`; any overpayment goes back to the buyer.
    ///
    /// Checks run in this order and the first failure wins:
    ///
    /// 1. the event is open
    /// 2. the quantity is positive (a zero-ticket purchase is rejected rather
    ///    than recorded as a no-op sale)
    /// 3. the payment covers the tickets
    /// 4. enough tickets remain
    ///
    /// # Errors
    ///
    /// - [`SalesError::EventNotFound`], [`SalesError::EventClosed`]
    /// - [`SalesError::InvalidQuantity`]: `quantity == 0`
    /// - [`SalesError::InsufficientPayment`]: `paid < price * quantity`
    /// - [`SalesError::InsufficientInventory`]: `quantity > remaining`
    /// - [`SalesError::TransferFailed`]: the overpayment could not be
    ///   returned; holdings and inventory are exactly as before the call
    /// - [`SalesError::ArithmeticOverflow`]
    #[tracing::instrument(skip_all, fields(%event_id, %buyer, quantity = quantity, paid = paid.units()))]
    pub async fn purchase(
        &self,
        event_id: EventId,
        buyer: Principal,
        quantity: u64,
        paid: Money,
    ) -> SalesResult<PurchaseReceipt> {
        let handle = self.record(event_id).await?;
        let mut record = handle.lock().await;

        if !record.is_open() {
            return Err(Self::rejected(SalesError::EventClosed(event_id)));
        }
        if quantity == 0 {
            return Err(Self::rejected(SalesError::InvalidQuantity));
        }
        let cost = self
            .ticket_price()
            .checked_multiply(quantity)
            .ok_or_else(|| Self::rejected(SalesError::ArithmeticOverflow))?;
        if paid < cost {
            return Err(Self::rejected(SalesError::InsufficientPayment {
                required: cost,
                paid,
            }));
        }
        if !record.inventory().can_sell(quantity) {
            return Err(Self::rejected(SalesError::InsufficientInventory {
                requested: quantity,
                available: record.inventory().remaining(),
            }));
        }
        let overpayment = paid
            .checked_sub(cost)
            .ok_or(SalesError::ArithmeticOverflow)?;

        let checkpoint = record.checkpoint(buyer);
        record
            .apply_sale(buyer, quantity, cost)
            .map_err(Self::rejected)?;

        let transfer = if overpayment.is_zero() {
            None
        } else {
            match self
                .pay_out(event_id, buyer, overpayment, TransferReason::Overpayment)
                .await
            {
                Ok(receipt) => Some(receipt),
                Err(error) => {
                    record.restore(checkpoint);
                    return Err(error);
                }
            }
        };

        self.env.notifier.publish(&Notification::TicketsPurchased {
            buyer,
            event_id,
            num_tickets: quantity,
            occurred_at: self.env.clock.now(),
        });
        let tickets_remaining = record.inventory().remaining();
        metrics::record_tickets_sold(quantity, cost);
        metrics::update_tickets_available(event_id, tickets_remaining);

        tracing::info!(
            cost = cost.units(),
            overpayment = overpayment.units(),
            tickets_remaining,
            "Tickets purchased"
        );

        Ok(PurchaseReceipt {
            event_id,
            buyer,
            quantity,
            cost,
            overpayment_returned: overpayment,
            transfer,
            tickets_remaining,
        })
    }

    /// Return every ticket `buyer` holds for the event and pay back their price.
    ///
    /// There is no open-state check. Settlement is the only way an event
    /// closes and it pays out the whole balance, so on a closed event the
    /// balance check fails instead.
    ///
    /// # Errors
    ///
    /// - [`SalesError::EventNotFound`]
    /// - [`SalesError::NoHoldings`]: the buyer holds nothing
    /// - [`SalesError::InsufficientEventBalance`]: the proceeds were already paid out
    /// - [`SalesError::TransferFailed`]: the refund could not be paid; the
    ///   buyer keeps their tickets
    /// - [`SalesError::ArithmeticOverflow`]
    #[tracing::instrument(skip_all, fields(%event_id, %buyer))]
    pub async fn refund(&self, event_id: EventId, buyer: Principal) -> SalesResult<RefundReceipt> {
        let handle = self.record(event_id).await?;
        let mut record = handle.lock().await;

        let held = record.registry().holdings_of(&buyer);
        if held == 0 {
            return Err(Self::rejected(SalesError::NoHoldings { event_id, buyer }));
        }
        let amount = self
            .ticket_price()
            .checked_multiply(held)
            .ok_or_else(|| Self::rejected(SalesError::ArithmeticOverflow))?;
        if record.balance() < amount {
            return Err(Self::rejected(SalesError::InsufficientEventBalance {
                required: amount,
                held: record.balance(),
            }));
        }

        let checkpoint = record.checkpoint(buyer);
        let quantity = record
            .apply_refund(&buyer, amount)
            .map_err(Self::rejected)?;

        let transfer = match self
            .pay_out(event_id, buyer, amount, TransferReason::Refund)
            .await
        {
            Ok(receipt) => receipt,
            Err(error) => {
                record.restore(checkpoint);
                return Err(error);
            }
        };

        self.env.notifier.publish(&Notification::RefundIssued {
            buyer,
            event_id,
            num_tickets: quantity,
            occurred_at: self.env.clock.now(),
        });
        metrics::record_refund(amount);
        metrics::update_tickets_available(event_id, record.inventory().remaining());

        tracing::info!(quantity, amount = amount.units(), "Refund issued");

        Ok(RefundReceipt {
            event_id,
            buyer,
            quantity,
            amount,
            transfer,
        })
    }

    /// Close the event and pay its collected balance to the administrator.
    ///
    /// Either the event ends up closed and paid out, or neither.
    ///
    /// # Errors
    ///
    /// - [`SalesError::Unauthorized`]: caller is not the administrator
    /// - [`SalesError::EventNotFound`]
    /// - [`SalesError::EventClosed`]: already settled; nothing is paid twice
    /// - [`SalesError::TransferFailed`]: the payout failed; the event stays open
    #[tracing::instrument(skip_all, fields(%event_id, %caller))]
    pub async fn settle(&self, event_id: EventId, caller: Principal) -> SalesResult<Settlement> {
        self.require_administrator(caller)?;

        let handle = self.record(event_id).await?;
        let mut record = handle.lock().await;

        if !record.is_open() {
            return Err(Self::rejected(SalesError::EventClosed(event_id)));
        }

        let amount = record.balance();
        let transfer = if amount.is_zero() {
            None
        } else {
            Some(
                self.pay_out(event_id, self.administrator, amount, TransferReason::Settlement)
                    .await?,
            )
        };
        record.close();

        self.env.notifier.publish(&Notification::SaleSettled {
            administrator: self.administrator,
            amount_transferred: amount,
            event_id,
            occurred_at: self.env.clock.now(),
        });
        metrics::record_settlement(amount);
        metrics::update_tickets_available(event_id, record.inventory().remaining());

        tracing::info!(amount = amount.units(), "Sale settled");

        Ok(Settlement {
            event_id,
            administrator: self.administrator,
            amount,
            transfer,
        })
    }

    // ========== Helpers ==========

    /// Handle for an event a mutating operation targets; misses count as rejections
    async fn record(&self, event_id: EventId) -> SalesResult<EventHandle> {
        self.lookup(event_id).await.map_err(Self::rejected)
    }

    /// Handle for an event a query reads
    async fn lookup(&self, event_id: EventId) -> SalesResult<EventHandle> {
        self.catalog
            .get(event_id)
            .await
            .ok_or(SalesError::EventNotFound(event_id))
    }

    fn require_administrator(&self, caller: Principal) -> SalesResult<()> {
        if caller == self.administrator {
            Ok(())
        } else {
            tracing::warn!(%caller, "Rejected administrator-only call");
            Err(Self::rejected(SalesError::Unauthorized { caller }))
        }
    }

    async fn pay_out(
        &self,
        event_id: EventId,
        recipient: Principal,
        amount: Money,
        reason: TransferReason,
    ) -> SalesResult<TransferReceipt> {
        let request = TransferRequest {
            event_id,
            recipient,
            amount,
            reason,
        };

        match self.env.transfer.transfer(request).await {
            Ok(receipt) => {
                tracing::debug!(
                    %reason,
                    amount = amount.units(),
                    transaction_id = %receipt.transaction_id,
                    "Transfer completed"
                );
                Ok(receipt)
            }
            Err(error) => {
                tracing::warn!(%reason, amount = amount.units(), %error, "Transfer failed, rolling back");
                metrics::record_transfer_failed(reason);
                Err(error.into())
            }
        }
    }

    fn rejected(error: SalesError) -> SalesError {
        tracing::debug!(%error, "Operation rejected");
        metrics::record_rejection(&error);
        error
    }
}

impl std::fmt::Debug for TicketSalesEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketSalesEngine")
            .field("administrator", &self.administrator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
