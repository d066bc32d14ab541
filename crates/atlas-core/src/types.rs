//! # Domain Types
//!
//! Core domain types for the Atlas order backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                              │
//! │                                                                    │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐     │
//! │  │    Product     │   │   SaleOrder    │   │    Invoice     │     │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │     │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (UUID)     │     │
//! │  │  company_id    │   │  sale_order_no │   │  sale_order_id │     │
//! │  │  price_cents   │   │  token_no      │   │  created_at    │     │
//! │  │  quantity      │   │  line_items[]  │   └────────────────┘     │
//! │  └────────────────┘   │  total_cents   │                          │
//! │                       └────────────────┘                          │
//! │                                                                    │
//! │  ┌────────────────┐   ┌────────────────┐                          │
//! │  │  OrderStatus   │   │     Unit       │                          │
//! │  │  Pending       │   │  Kg Litre      │                          │
//! │  │  Completed     │   │  Piece Gram    │                          │
//! │  │  Cancelled     │   └────────────────┘                          │
//! │  └────────────────┘                                               │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has a UUID v4 `id` used for storage relations. Sale orders
//! additionally carry two generated business identifiers: the globally unique
//! `sale_order_number` and the per-day `token_no` (see the sequence
//! repository in atlas-db).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Company
// =============================================================================

/// A tenant. Company management is owned by an external collaborator; the
/// order backend only resolves companies by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Measurement Unit
// =============================================================================

/// Unit a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum Unit {
    #[serde(rename = "kg")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "kg"))]
    Kilogram,
    #[serde(rename = "ltr")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ltr"))]
    Litre,
    #[serde(rename = "piece")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "piece"))]
    Piece,
    #[serde(rename = "gm")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "gm"))]
    Gram,
}

// =============================================================================
// Product
// =============================================================================

/// A product in a company's catalog.
///
/// `quantity` is the available stock. The stock ledger in atlas-db is its
/// exclusive writer; `quantity >= 0` holds at all times because every
/// decrement is a conditional update, not a read-then-write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Company this product belongs to.
    pub company_id: String,

    /// Optional category reference (category management is external).
    pub category_id: Option<String>,

    /// Display name, also used in out-of-stock rejections.
    pub name: String,

    /// Optional business code.
    pub code: Option<String>,

    /// Optional description.
    pub description: Option<String>,

    /// Unit the product is sold in.
    pub unit: Option<Unit>,

    /// Selling price in cents; the price observed at reservation time is the
    /// price an order line is charged at.
    pub selling_price_cents: i64,

    /// Purchase price in cents (margin bookkeeping only).
    pub buying_price_cents: Option<i64>,

    /// Available stock. Never negative.
    pub quantity: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Advisory stock check. The authoritative check is the conditional
    /// decrement in the stock ledger; this exists to reject obviously
    /// unfillable lines with a product-specific message before reserving.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of a sale order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order is open; lines may be added or revised.
    Pending,
    /// Order has been placed and invoiced. Terminal.
    Completed,
    /// Order was cancelled. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further line or status mutation.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of a sale order, embedded in the order document.
///
/// Adding products appends entries, so the same `product_id` may appear more
/// than once; quantity revision rewrites the first matching entry in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: i64,
}

// =============================================================================
// Sale Order
// =============================================================================

/// A sale order with its embedded line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleOrder {
    pub id: String,

    /// Generated business number, `SALEORD{n}`. Assigned exactly once at
    /// first persistence, never changed afterwards.
    pub sale_order_number: String,

    /// Generated per-day token, the bare counter value as a string.
    /// Assigned together with `sale_order_number`.
    pub token_no: String,

    /// User who created the order.
    pub user_id: String,

    /// Company the order belongs to.
    pub company_id: String,

    pub status: OrderStatus,

    /// Ordered line items, embedded in the order row.
    pub line_items: Vec<LineItem>,

    /// Running total in cents; kept consistent with per-line quantities at
    /// the price observed when each line was written.
    pub total_cents: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SaleOrder {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A sale order that has not been persisted yet.
///
/// Deliberately has no number fields: `sale_order_number` and `token_no`
/// exist only on stored orders, which is what makes "assigned exactly once,
/// at first persistence" hold by construction.
#[derive(Debug, Clone)]
pub struct NewSaleOrder {
    pub user_id: String,
    pub company_id: String,
    pub status: OrderStatus,
    pub line_items: Vec<LineItem>,
    pub total_cents: i64,
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice referencing a completed sale order. Created exactly once per
/// completed order; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub sale_order_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn test_unit_serde_names() {
        assert_eq!(serde_json::to_string(&Unit::Litre).unwrap(), "\"ltr\"");
        assert_eq!(serde_json::to_string(&Unit::Gram).unwrap(), "\"gm\"");
    }

    #[test]
    fn test_line_items_roundtrip() {
        // Duplicate product ids are legal in the embedded document.
        let lines = vec![
            LineItem {
                product_id: "p1".into(),
                quantity: 2,
            },
            LineItem {
                product_id: "p1".into(),
                quantity: 3,
            },
        ];
        let json = serde_json::to_string(&lines).unwrap();
        let back: Vec<LineItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lines);
    }
}
