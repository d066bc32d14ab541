//! # Repository Module
//!
//! Database repository implementations for the Atlas order backend.
//!
//! ## Pattern
//! Each repository is a thin handle over the shared pool:
//!
//! ```rust,ignore
//! let product = db.products().get_by_id("uuid").await?;
//! ```
//!
//! Operations that must participate in a caller-owned transaction are also
//! exposed as associated `*_on` functions generic over the executor, so the
//! same SQL runs against the pool or against `&mut *tx`:
//!
//! ```rust,ignore
//! let mut tx = db.begin().await?;
//! ProductRepository::release_on(&mut *tx, &id, delta).await?;
//! SaleOrderRepository::update_lines_on(&mut *tx, &order_id, &lines, total).await?;
//! tx.commit().await?;
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - catalog CRUD plus the stock ledger
//! - [`sale_order::SaleOrderRepository`] - order rows with embedded lines
//! - [`sequence::SequenceRepository`] - durable atomic counters
//! - [`invoice::InvoiceRepository`] - invoice records
//! - [`company::CompanyRepository`] - tenant existence lookups

pub mod company;
pub mod invoice;
pub mod product;
pub mod sale_order;
pub mod sequence;
