//! # atlas-db: Database Layer for the Atlas Order Backend
//!
//! SQLite storage via sqlx: connection pool, embedded migrations, and the
//! repositories the lifecycle service is built on.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                      Atlas Backend Data Flow                       │
//! │                                                                    │
//! │  atlas-orders (OrderService)                                       │
//! │       │                                                            │
//! │       ▼                                                            │
//! │  ┌──────────────────────────────────────────────────────────────┐  │
//! │  │                    atlas-db (THIS CRATE)                     │  │
//! │  │                                                              │  │
//! │  │   ┌────────────┐   ┌────────────────┐   ┌───────────────┐   │  │
//! │  │   │  Database  │   │  Repositories  │   │  Migrations   │   │  │
//! │  │   │ (pool.rs)  │◄──│  product       │   │  (embedded)   │   │  │
//! │  │   │ SqlitePool │   │  sale_order    │   │  001_*.sql    │   │  │
//! │  │   │ WAL mode   │   │  sequence      │   │  002_*.sql    │   │  │
//! │  │   └────────────┘   │  invoice       │   └───────────────┘   │  │
//! │  │                    │  company       │                       │  │
//! │  │                    └────────────────┘                       │  │
//! │  └──────────────────────────────────────────────────────────────┘  │
//! │       │                                                            │
//! │       ▼                                                            │
//! │  SQLite database file (or :memory: in tests)                       │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency contract
//!
//! The stock ledger ([`repository::product::ProductRepository`]) and the
//! sequence counters ([`repository::sequence::SequenceRepository`]) perform
//! their mutations as single conditional statements: the store serializes
//! concurrent callers and there is no read-then-write window. Multi-statement
//! atomicity (line revision) goes through [`pool::Database::begin`].

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::company::CompanyRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::product::{ProductRepository, ReserveOutcome};
pub use repository::sale_order::SaleOrderRepository;
pub use repository::sequence::SequenceRepository;
