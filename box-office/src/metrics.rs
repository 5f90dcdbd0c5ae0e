//! Business metrics for the box office ledger.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the host
//! application installs a recorder.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `box_office_events_created_total` - Events added to the catalog
//! - `box_office_tickets_sold_total` - Tickets sold
//! - `box_office_revenue_units_total` - Ticket revenue collected
//! - `box_office_refunds_total` - Refunds issued
//! - `box_office_refunded_units_total` - Money returned through refunds
//! - `box_office_settlements_total` - Events settled
//! - `box_office_settled_units_total` - Money paid to the administrator
//! - `box_office_transfer_failures_total{reason}` - Failed transfers by reason
//! - `box_office_rejections_total{error}` - Operations rejected before any transfer
//!
//! ## Gauges
//! - `box_office_tickets_available{event_id}` - Tickets left per event

use crate::error::SalesError;
use box_office_core::{EventId, Money, TransferReason};
use metrics::{describe_counter, describe_gauge};

/// Register descriptions for every series this crate records.
///
/// Call once at startup, after installing a recorder.
pub fn register_sales_metrics() {
    describe_counter!(
        "box_office_events_created_total",
        "Total number of events created"
    );
    describe_counter!("box_office_tickets_sold_total", "Total number of tickets sold");
    describe_counter!(
        "box_office_revenue_units_total",
        "Ticket revenue collected, in smallest currency units"
    );
    describe_counter!("box_office_refunds_total", "Total number of refunds issued");
    describe_counter!(
        "box_office_refunded_units_total",
        "Money returned through refunds, in smallest currency units"
    );
    describe_counter!(
        "box_office_settlements_total",
        "Total number of settled events"
    );
    describe_counter!(
        "box_office_settled_units_total",
        "Money paid to the administrator, in smallest currency units"
    );
    describe_counter!(
        "box_office_transfer_failures_total",
        "Failed funds transfers by reason (overpayment, refund, settlement)"
    );
    describe_counter!(
        "box_office_rejections_total",
        "Operations rejected by validation, by error kind"
    );
    describe_gauge!(
        "box_office_tickets_available",
        "Tickets still available per event"
    );

    tracing::info!("Sales metrics registered");
}

/// Record an event created
pub fn record_event_created() {
    metrics::counter!("box_office_events_created_total").increment(1);
}

/// Record a committed purchase
pub fn record_tickets_sold(quantity: u64, cost: Money) {
    metrics::counter!("box_office_tickets_sold_total").increment(quantity);
    metrics::counter!("box_office_revenue_units_total").increment(cost.units());
}

/// Record a committed refund
pub fn record_refund(amount: Money) {
    metrics::counter!("box_office_refunds_total").increment(1);
    metrics::counter!("box_office_refunded_units_total").increment(amount.units());
}

/// Record a committed settlement
pub fn record_settlement(amount: Money) {
    metrics::counter!("box_office_settlements_total").increment(1);
    metrics::counter!("box_office_settled_units_total").increment(amount.units());
}

/// Record a failed transfer
pub fn record_transfer_failed(reason: TransferReason) {
    metrics::counter!("box_office_transfer_failures_total", "reason" => reason.as_str())
        .increment(1);
}

/// Record an operation rejected by validation
pub fn record_rejection(error: &SalesError) {
    let kind = match error {
        SalesError::Unauthorized { .. } => "unauthorized",
        SalesError::EventNotFound(_) => "event_not_found",
        SalesError::EventClosed(_) => "event_closed",
        SalesError::InvalidQuantity => "invalid_quantity",
        SalesError::InsufficientPayment { .. } => "insufficient_payment",
        SalesError::InsufficientInventory { .. } => "insufficient_inventory",
        SalesError::NoHoldings { .. } => "no_holdings",
        SalesError::InsufficientEventBalance { .. } => "insufficient_event_balance",
        SalesError::TransferFailed { .. } => "transfer_failed",
        SalesError::ArithmeticOverflow => "arithmetic_overflow",
    };
    metrics::counter!("box_office_rejections_total", "error" => kind).increment(1);
}

/// Update the available tickets gauge for an event
#[allow(clippy::cast_precision_loss)] // Gauges are f64; ticket counts stay far below 2^52
pub fn update_tickets_available(event_id: EventId, available: u64) {
    metrics::gauge!("box_office_tickets_available", "event_id" => event_id.to_string())
        .set(available as f64);
}
