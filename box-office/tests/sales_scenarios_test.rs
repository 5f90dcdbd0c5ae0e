//! End-to-end sales scenarios against the engine with recording doubles.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect

use box_office::{SalesConfig, SalesEnvironment, SalesError, TicketSalesEngine};
use box_office_core::{EventId, Money, Notification, Principal, TransferReason};
use box_office_testing::{RecordingSink, ScriptedTransfer, init_test_tracing, test_clock};
use std::sync::Arc;

const PRICE: Money = Money::from_units(100);

struct Fixture {
    engine: TicketSalesEngine,
    admin: Principal,
    transfer: ScriptedTransfer,
    sink: RecordingSink,
}

impl Fixture {
    fn new() -> Self {
        init_test_tracing();
        let admin = Principal::new();
        let transfer = ScriptedTransfer::new();
        let sink = RecordingSink::new();
        let engine = TicketSalesEngine::new(
            admin,
            SalesConfig { ticket_price: PRICE },
            SalesEnvironment::new(
                Arc::new(test_clock()),
                Arc::new(transfer.clone()),
                Arc::new(sink.clone()),
            ),
        );
        Self {
            engine,
            admin,
            transfer,
            sink,
        }
    }

    async fn event(&self, total: u64) -> EventId {
        self.engine
            .create_event(self.admin, "Spring Concert", "https://spring.example", total)
            .await
            .expect("administrator can create events")
    }
}

fn units(n: u64) -> Money {
    Money::from_units(n)
}

#[tokio::test]
async fn test_new_event_round_trip() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;

    let view = fx.engine.get_event(event_id).await.unwrap();

    assert_eq!(view.id, event_id);
    assert_eq!(view.description, "Spring Concert");
    assert_eq!(view.website, "https://spring.example");
    assert_eq!(view.total_tickets, 10);
    assert_eq!(view.tickets_available, 10);
    assert_eq!(view.sold, 0);
    assert!(view.is_open);
    assert_eq!(view.balance, Money::ZERO);
}

#[tokio::test]
async fn test_refund_then_resell_full_capacity() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let alice = Principal::new();
    let bob = Principal::new();

    fx.engine.purchase(event_id, alice, 3, units(300)).await.unwrap();
    assert_eq!(fx.engine.get_event(event_id).await.unwrap().sold, 3);
    assert_eq!(fx.engine.buyer_ticket_count(event_id, alice).await.unwrap(), 3);

    let refund = fx.engine.refund(event_id, alice).await.unwrap();
    assert_eq!(refund.quantity, 3);
    assert_eq!(refund.amount, units(300));
    assert_eq!(fx.engine.get_event(event_id).await.unwrap().sold, 0);
    assert_eq!(fx.engine.buyer_ticket_count(event_id, alice).await.unwrap(), 0);

    let receipt = fx.engine.purchase(event_id, bob, 10, units(1000)).await.unwrap();
    assert_eq!(receipt.tickets_remaining, 0);
    assert_eq!(fx.engine.get_event(event_id).await.unwrap().sold, 10);

    let result = fx
        .engine
        .purchase(event_id, Principal::new(), 1, units(100))
        .await;
    assert_eq!(
        result,
        Err(SalesError::InsufficientInventory {
            requested: 1,
            available: 0
        })
    );
}

#[tokio::test]
async fn test_overpayment_is_returned_to_buyer() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let buyer = Principal::new();

    let receipt = fx
        .engine
        .purchase(event_id, buyer, 2, PRICE.checked_multiply(3).unwrap())
        .await
        .unwrap();

    assert_eq!(receipt.cost, units(200));
    assert_eq!(receipt.overpayment_returned, PRICE);
    assert!(receipt.transfer.is_some());

    let returned = fx.transfer.completed();
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].recipient, buyer);
    assert_eq!(returned[0].reason, TransferReason::Overpayment);

    // Net cost: paid 300, got 100 back
    let paid = units(300);
    let net = paid.checked_sub(fx.transfer.total_paid_to(buyer)).unwrap();
    assert_eq!(net, units(200));
    assert_eq!(fx.engine.get_event(event_id).await.unwrap().balance, units(200));
}

#[tokio::test]
async fn test_exact_payment_moves_no_money() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let buyer = Principal::new();

    let receipt = fx.engine.purchase(event_id, buyer, 4, units(400)).await.unwrap();

    assert_eq!(receipt.overpayment_returned, Money::ZERO);
    assert!(receipt.transfer.is_none());
    assert!(fx.transfer.attempts().is_empty());
    assert_eq!(fx.engine.buyer_ticket_count(event_id, buyer).await.unwrap(), 4);
}

#[tokio::test]
async fn test_purchases_accumulate_per_buyer() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let buyer = Principal::new();

    fx.engine.purchase(event_id, buyer, 1, units(100)).await.unwrap();
    fx.engine.purchase(event_id, buyer, 2, units(200)).await.unwrap();

    assert_eq!(fx.engine.buyer_ticket_count(event_id, buyer).await.unwrap(), 3);
    assert_eq!(fx.engine.get_event(event_id).await.unwrap().buyers, 1);
}

#[tokio::test]
async fn test_underpayment_is_rejected() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let buyer = Principal::new();

    let result = fx.engine.purchase(event_id, buyer, 2, units(199)).await;

    assert_eq!(
        result,
        Err(SalesError::InsufficientPayment {
            required: units(200),
            paid: units(199),
        })
    );
    assert_eq!(fx.engine.buyer_ticket_count(event_id, buyer).await.unwrap(), 0);
}

#[tokio::test]
async fn test_second_refund_has_no_holdings() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let buyer = Principal::new();
    fx.engine.purchase(event_id, buyer, 2, units(200)).await.unwrap();

    fx.engine.refund(event_id, buyer).await.unwrap();
    let second = fx.engine.refund(event_id, buyer).await;

    assert_eq!(second, Err(SalesError::NoHoldings { event_id, buyer }));
    assert_eq!(fx.transfer.completed().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_settle_leaves_event_unchanged() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    fx.engine
        .purchase(event_id, Principal::new(), 3, units(300))
        .await
        .unwrap();
    let before = fx.engine.get_event(event_id).await.unwrap();
    let intruder = Principal::new();

    let result = fx.engine.settle(event_id, intruder).await;

    assert_eq!(result, Err(SalesError::Unauthorized { caller: intruder }));
    assert_eq!(fx.engine.get_event(event_id).await.unwrap(), before);
    assert!(fx.transfer.attempts().is_empty());
}

#[tokio::test]
async fn test_settle_pays_balance_once() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    fx.engine
        .purchase(event_id, Principal::new(), 3, units(300))
        .await
        .unwrap();
    fx.engine
        .purchase(event_id, Principal::new(), 2, units(200))
        .await
        .unwrap();

    let settlement = fx.engine.settle(event_id, fx.admin).await.unwrap();
    assert_eq!(settlement.amount, units(500));
    assert_eq!(settlement.administrator, fx.admin);
    assert_eq!(fx.transfer.total_paid_to(fx.admin), units(500));

    let again = fx.engine.settle(event_id, fx.admin).await;
    assert_eq!(again, Err(SalesError::EventClosed(event_id)));
    assert_eq!(fx.transfer.total_paid_to(fx.admin), units(500));

    let view = fx.engine.get_event(event_id).await.unwrap();
    assert!(!view.is_open);
    assert_eq!(view.balance, Money::ZERO);
    assert_eq!(view.sold, 5);
}

#[tokio::test]
async fn test_purchase_after_settle_is_rejected() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    fx.engine.settle(event_id, fx.admin).await.unwrap();

    let result = fx
        .engine
        .purchase(event_id, Principal::new(), 1, units(100))
        .await;

    assert_eq!(result, Err(SalesError::EventClosed(event_id)));
}

#[tokio::test]
async fn test_refund_after_settle_lacks_funds() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let buyer = Principal::new();
    fx.engine.purchase(event_id, buyer, 2, units(200)).await.unwrap();
    fx.engine.settle(event_id, fx.admin).await.unwrap();

    let result = fx.engine.refund(event_id, buyer).await;

    assert_eq!(
        result,
        Err(SalesError::InsufficientEventBalance {
            required: units(200),
            held: Money::ZERO,
        })
    );
    assert_eq!(fx.engine.buyer_ticket_count(event_id, buyer).await.unwrap(), 2);
}

#[tokio::test]
async fn test_refunds_reduce_settlement() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let stays = Principal::new();
    let leaves = Principal::new();
    fx.engine.purchase(event_id, stays, 3, units(300)).await.unwrap();
    fx.engine.purchase(event_id, leaves, 4, units(400)).await.unwrap();

    fx.engine.refund(event_id, leaves).await.unwrap();
    let settlement = fx.engine.settle(event_id, fx.admin).await.unwrap();

    assert_eq!(settlement.amount, units(300));
    assert_eq!(fx.transfer.total_paid_to(leaves), units(400));
}

#[tokio::test]
async fn test_events_are_independent() {
    let fx = Fixture::new();
    let first = fx.event(5).await;
    let second = fx.event(5).await;
    let buyer = Principal::new();

    fx.engine.purchase(first, buyer, 5, units(500)).await.unwrap();
    fx.engine.settle(first, fx.admin).await.unwrap();

    let view = fx.engine.get_event(second).await.unwrap();
    assert!(view.is_open);
    assert_eq!(view.tickets_available, 5);
    assert_eq!(fx.engine.buyer_ticket_count(second, buyer).await.unwrap(), 0);
    fx.engine.purchase(second, buyer, 1, units(100)).await.unwrap();
}

#[tokio::test]
async fn test_notifications_follow_commit_order() {
    let fx = Fixture::new();
    let event_id = fx.event(10).await;
    let buyer = Principal::new();

    fx.engine.purchase(event_id, buyer, 2, units(250)).await.unwrap();
    fx.engine.purchase(event_id, buyer, 0, units(0)).await.unwrap_err();
    fx.engine.refund(event_id, buyer).await.unwrap();
    fx.engine.settle(event_id, fx.admin).await.unwrap();

    assert_eq!(
        fx.sink.event_types(),
        vec![
            "EventCreated",
            "TicketsPurchased",
            "RefundIssued",
            "SaleSettled"
        ]
    );
    match &fx.sink.notifications()[3] {
        Notification::SaleSettled {
            administrator,
            amount_transferred,
            ..
        } => {
            assert_eq!(*administrator, fx.admin);
            assert_eq!(*amount_transferred, Money::ZERO);
        }
        other => panic!("expected SaleSettled, got {other:?}"),
    }
}

#[tokio::test]
async fn test_notification_serializes_with_type_tag() {
    let fx = Fixture::new();
    let event_id = fx.event(3).await;
    let buyer = Principal::new();
    fx.engine.purchase(event_id, buyer, 1, units(100)).await.unwrap();

    let notification = fx.sink.for_event(event_id).pop().unwrap();
    let json = serde_json::to_value(&notification).unwrap();

    assert_eq!(json["type"], "TicketsPurchased");
    assert_eq!(json["num_tickets"], 1);
}

#[tokio::test]
async fn test_receipts_serialize() {
    let fx = Fixture::new();
    let event_id = fx.event(3).await;

    let receipt = fx
        .engine
        .purchase(event_id, Principal::new(), 1, units(150))
        .await
        .unwrap();
    let json = serde_json::to_string(&receipt).unwrap();
    let back: box_office::PurchaseReceipt = serde_json::from_str(&json).unwrap();

    assert_eq!(back, receipt);
}
