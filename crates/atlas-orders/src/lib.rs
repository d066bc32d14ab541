//! # atlas-orders: Sale-Order Lifecycle Service
//!
//! Orchestrates the sale-order lifecycle over the atlas-db repositories:
//! creation, line addition, line-quantity revision, completion (with invoice
//! emission) and cancellation.
//!
//! ## State machine
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                                                                    │
//! │   create ──► PENDING ──── complete ────► COMPLETED (terminal)      │
//! │                │  ▲                          │                     │
//! │     add_lines  │  │ revise_lines             └─► invoice emitted   │
//! │                ▼  │                              (fire-and-forget) │
//! │              PENDING                                               │
//! │                │                                                   │
//! │                └────── cancel ─────────► CANCELLED (terminal)      │
//! │                                                                    │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency boundaries
//!
//! - Stock checks and decrements are single conditional statements in the
//!   stock ledger; the advisory pre-read only shapes the error message.
//! - `revise_order_lines` wraps all of its stock adjustments and the order
//!   update in one transaction: all-or-nothing.
//! - `create_order` and `add_order_lines` deliberately do NOT: each line's
//!   reservation commits immediately, so a request that fails on a later
//!   line leaves the earlier lines' stock decremented with no order row to
//!   account for it. This mirrors the system this backend replaces and is a
//!   documented limitation, not an invariant.

pub mod emitter;
pub mod error;
pub mod service;

pub use emitter::InvoiceEmitter;
pub use error::{OrderError, OrderResult};
pub use service::OrderService;
