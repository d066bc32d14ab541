//! # Product Repository
//!
//! Catalog operations plus the stock ledger.
//!
//! ## Stock Ledger
//! This repository is the exclusive writer of `products.quantity`. Both
//! mutation points are single conditional statements, so concurrent callers
//! serialize at the store with no lost updates:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  try_reserve(id, 3)                                                │
//! │                                                                    │
//! │  UPDATE products SET quantity = quantity - 3                       │
//! │  WHERE id = ? AND quantity >= 3                                    │
//! │       │                                                            │
//! │       ├── 1 row   → Reserved (stock decremented)                   │
//! │       └── 0 rows  → InsufficientStock (missing product OR short    │
//! │                     stock at this instant - a normal rejection)    │
//! │                                                                    │
//! │  There is NO read-then-write window: the predicate and the         │
//! │  decrement are one statement. Any preceding read is advisory.      │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `release` adjusts by a signed delta (positive returns stock after a line
//! quantity was lowered, negative consumes more after it was raised).

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use atlas_core::{Product, Unit};

/// Outcome of a conditional stock reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Stock was decremented by the requested quantity.
    Reserved,
    /// The conditional predicate failed: the product is gone or its stock
    /// was below the requested quantity at the instant of the attempt.
    InsufficientStock,
}

/// Row shape for `products`; converted into the domain type on the way out.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    company_id: String,
    category_id: Option<String>,
    name: String,
    code: Option<String>,
    description: Option<String>,
    unit: Option<Unit>,
    selling_price_cents: i64,
    buying_price_cents: Option<i64>,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            company_id: row.company_id,
            category_id: row.category_id,
            name: row.name,
            code: row.code,
            description: row.description,
            unit: row.unit,
            selling_price_cents: row.selling_price_cents,
            buying_price_cents: row.buying_price_cents,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, company_id, category_id, name, code, description, unit, \
     selling_price_cents, buying_price_cents, quantity, created_at, updated_at";

/// Repository for product catalog operations and stock mutation.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Stock Ledger
    // =========================================================================

    /// Atomically checks and decrements stock in one statement.
    pub async fn try_reserve(&self, id: &str, quantity: i64) -> DbResult<ReserveOutcome> {
        Self::try_reserve_on(&self.pool, id, quantity).await
    }

    /// [`ProductRepository::try_reserve`] against an arbitrary executor.
    pub async fn try_reserve_on<'e, E>(
        executor: E,
        id: &str,
        quantity: i64,
    ) -> DbResult<ReserveOutcome>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        debug!(id = %id, quantity = %quantity, "reserving stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            debug!(id = %id, quantity = %quantity, "reservation rejected");
            return Ok(ReserveOutcome::InsufficientStock);
        }

        Ok(ReserveOutcome::Reserved)
    }

    /// Adjusts stock by a signed delta.
    ///
    /// Positive delta returns stock; negative delta consumes more. The
    /// `quantity >= 0` CHECK aborts the statement if a negative delta would
    /// drive stock below zero, which surfaces as a query error the caller's
    /// transaction rolls back on.
    pub async fn release(&self, id: &str, delta: i64) -> DbResult<()> {
        Self::release_on(&self.pool, id, delta).await
    }

    /// [`ProductRepository::release`] against an arbitrary executor.
    pub async fn release_on<'e, E>(executor: E, id: &str, delta: i64) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        debug!(id = %id, delta = %delta, "adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Gets a product by its id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        Self::get_by_id_on(&self.pool, id).await
    }

    /// [`ProductRepository::get_by_id`] against an arbitrary executor, for
    /// price/ownership reads inside a revision transaction.
    pub async fn get_by_id_on<'e, E>(executor: E, id: &str) -> DbResult<Option<Product>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Lists a company's products, optionally narrowed to one category.
    pub async fn list_by_company(
        &self,
        company_id: &str,
        category_id: Option<&str>,
    ) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = match category_id {
            Some(category_id) => {
                sqlx::query_as(&format!(
                    "SELECT {SELECT_COLUMNS} FROM products \
                     WHERE company_id = ?1 AND category_id = ?2 ORDER BY name"
                ))
                .bind(company_id)
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {SELECT_COLUMNS} FROM products WHERE company_id = ?1 ORDER BY name"
                ))
                .bind(company_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, company_id, category_id, name, code, description, unit,
                selling_price_cents, buying_price_cents, quantity,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&product.id)
        .bind(&product.company_id)
        .bind(&product.category_id)
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.description)
        .bind(product.unit)
        .bind(product.selling_price_cents)
        .bind(product.buying_price_cents)
        .bind(product.quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's catalog fields (including an absolute
    /// restock of `quantity`; sale-time mutation goes through the ledger).
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                category_id = ?2,
                name = ?3,
                code = ?4,
                description = ?5,
                unit = ?6,
                selling_price_cents = ?7,
                buying_price_cents = ?8,
                quantity = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.category_id)
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.description)
        .bind(product.unit)
        .bind(product.selling_price_cents)
        .bind(product.buying_price_cents)
        .bind(product.quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product id.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use atlas_core::Company;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, quantity: i64) -> Product {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: "Test Traders".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.companies().insert(&company).await.unwrap();

        let product = Product {
            id: generate_product_id(),
            company_id: company.id,
            category_id: None,
            name: "Basmati Rice 5kg".to_string(),
            code: Some("RICE-5".to_string()),
            description: None,
            unit: Some(Unit::Kilogram),
            selling_price_cents: 1000,
            buying_price_cents: Some(800),
            quantity,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_reserve_decrements_stock() {
        let db = test_db().await;
        let product = seed_product(&db, 5).await;

        let outcome = db.products().try_reserve(&product.id, 3).await.unwrap();
        assert_eq!(outcome, ReserveOutcome::Reserved);

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 2);
    }

    #[tokio::test]
    async fn test_reserve_rejects_when_short() {
        let db = test_db().await;
        let product = seed_product(&db, 2).await;

        let outcome = db.products().try_reserve(&product.id, 3).await.unwrap();
        assert_eq!(outcome, ReserveOutcome::InsufficientStock);

        // Stock untouched by the failed predicate.
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 2);
    }

    #[tokio::test]
    async fn test_reserve_missing_product() {
        let db = test_db().await;
        seed_product(&db, 2).await;

        let outcome = db
            .products()
            .try_reserve(&Uuid::new_v4().to_string(), 1)
            .await
            .unwrap();
        assert_eq!(outcome, ReserveOutcome::InsufficientStock);
    }

    #[tokio::test]
    async fn test_release_signed_delta() {
        let db = test_db().await;
        let product = seed_product(&db, 5).await;

        db.products().release(&product.id, 3).await.unwrap();
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 8);

        db.products().release(&product.id, -2).await.unwrap();
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 6);
    }

    #[tokio::test]
    async fn test_release_cannot_drive_stock_negative() {
        let db = test_db().await;
        let product = seed_product(&db, 1).await;

        // The CHECK constraint aborts the statement.
        let result = db.products().release(&product.id, -2).await;
        assert!(result.is_err());

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 1);
    }

    #[tokio::test]
    async fn test_catalog_roundtrip() {
        let db = test_db().await;
        let mut product = seed_product(&db, 5).await;

        product.name = "Basmati Rice 10kg".to_string();
        product.selling_price_cents = 1900;
        db.products().update(&product).await.unwrap();

        let listed = db
            .products()
            .list_by_company(&product.company_id, None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Basmati Rice 10kg");
        assert_eq!(listed[0].selling_price_cents, 1900);

        db.products().delete(&product.id).await.unwrap();
        assert!(db.products().get_by_id(&product.id).await.unwrap().is_none());
        assert_eq!(db.products().count().await.unwrap(), 0);
    }
}
