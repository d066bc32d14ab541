//! # atlas-core: Pure Business Logic for the Atlas Order Backend
//!
//! This crate is the heart of the Atlas order backend. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                     Atlas Backend Architecture                     │
//! │                                                                    │
//! │  ┌──────────────────────────────────────────────────────────────┐  │
//! │  │                  Transport layer (external)                  │  │
//! │  │   routing, schema validation, JWT verification               │  │
//! │  └──────────────────────────────┬───────────────────────────────┘  │
//! │                                 │ verified Principal                │
//! │  ┌──────────────────────────────▼───────────────────────────────┐  │
//! │  │                 atlas-orders (lifecycle service)             │  │
//! │  └──────────────────────────────┬───────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼───────────────────────────────┐  │
//! │  │               ★ atlas-core (THIS CRATE) ★                    │  │
//! │  │                                                              │  │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────────┐     │  │
//! │  │   │  types   │ │  money   │ │  order   │ │ validation │     │  │
//! │  │   │ Product  │ │  Money   │ │ LineItem │ │   rules    │     │  │
//! │  │   │SaleOrder │ │          │ │  merge   │ │   checks   │     │  │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └────────────┘     │  │
//! │  │                                                              │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │  │
//! │  └──────────────────────────────┬───────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼───────────────────────────────┐  │
//! │  │                  atlas-db (storage layer)                    │  │
//! │  └──────────────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SaleOrder, Invoice, Company)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`order`] - Order aggregate rules (line merging, totals)
//! - [`principal`] - Authenticated principal and tenant checks
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod principal;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use principal::Principal;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity accepted for a single order line.
///
/// Guards against accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Maximum number of lines accepted in a single request.
pub const MAX_REQUEST_LINES: usize = 100;

/// Prefix for generated sale-order numbers (`SALEORD42`).
pub const SALE_ORDER_NUMBER_PREFIX: &str = "SALEORD";

/// Sequence name backing [`SALE_ORDER_NUMBER_PREFIX`]-formatted numbers.
pub const SALE_ORDER_SEQUENCE: &str = "sale_order";

/// Sequence name backing the per-day token numbers.
pub const TOKEN_SEQUENCE: &str = "token_no";
