//! # Box Office
//!
//! Ticket sales ledger: per-event inventory, buyer holdings and collected
//! funds, with every money movement delegated to an injected
//! [`FundsTransfer`](box_office_core::FundsTransfer).
//!
//! ## Architecture
//!
//! ```text
//!                ┌──────────────────────────────┐
//!   caller ────► │      TicketSalesEngine       │ ──► NotificationSink
//!                │  create / purchase / refund  │
//!                │  settle / queries / scope    │ ──► FundsTransfer
//!                └──────────────┬───────────────┘
//!                               │ RwLock (lookup/append only)
//!                ┌──────────────▼───────────────┐
//!                │         EventCatalog         │
//!                │ [Mutex<EventRecord>; n]      │
//!                └──────────────┬───────────────┘
//!                               │ per-event lock
//!              Inventory · BuyerRegistry · balance · is_open
//! ```
//!
//! Operations on the same event are serialized by its lock, which stays held
//! while a transfer is in flight. Operations on different events run in
//! parallel.
//!
//! ## Example
//!
//! ```
//! use box_office::{SalesConfig, SalesEnvironment, TicketSalesEngine, TracingSink};
//! use box_office_core::{
//!     FundsTransfer, Money, Principal, SystemClock, TransferFuture, TransferReceipt,
//!     TransferRequest,
//! };
//! use std::sync::Arc;
//!
//! struct Instant;
//!
//! impl FundsTransfer for Instant {
//!     fn transfer(&self, request: TransferRequest) -> TransferFuture<'_> {
//!         Box::pin(async move {
//!             Ok(TransferReceipt {
//!                 transaction_id: "txn".to_string(),
//!                 amount: request.amount,
//!             })
//!         })
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let admin = Principal::new();
//! let engine = TicketSalesEngine::new(
//!     admin,
//!     SalesConfig::default(),
//!     SalesEnvironment::new(Arc::new(SystemClock), Arc::new(Instant), Arc::new(TracingSink)),
//! );
//!
//! let event = engine.create_event(admin, "Concert", "https://concert.example", 10).await?;
//! let buyer = Principal::new();
//! engine.purchase(event, buyer, 2, Money::from_units(250)).await?;
//!
//! assert_eq!(engine.buyer_ticket_count(event, buyer).await?, 2);
//! assert_eq!(engine.get_event(event).await?.tickets_available, 8);
//! # Ok::<(), box_office::SalesError>(())
//! # }).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Event records and the catalog that owns them
pub mod catalog;

/// Configuration loaded from the environment
pub mod config;

/// The sales engine
pub mod engine;

/// Error types for ledger operations
pub mod error;

/// Per-event ticket counters
pub mod inventory;

/// Business metrics
pub mod metrics;

/// Per-event buyer holdings
pub mod registry;

/// Single-event operation handle
pub mod scope;

/// Notification sink backed by `tracing`
pub mod sink;

pub use catalog::{EventCatalog, EventHandle, EventRecord, EventView};
pub use config::{Config, ConfigError, DEFAULT_TICKET_PRICE, SalesConfig};
pub use engine::{PurchaseReceipt, RefundReceipt, SalesEnvironment, Settlement, TicketSalesEngine};
pub use error::{SalesError, SalesResult};
pub use inventory::Inventory;
pub use registry::BuyerRegistry;
pub use scope::EventSales;
pub use sink::TracingSink;
