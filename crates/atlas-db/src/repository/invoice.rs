//! # Invoice Repository
//!
//! Invoice records referencing completed sale orders. Insert-only: there is
//! no update or cancellation path, and a unique index on `sale_order_id`
//! backs the exactly-once guarantee at the store level.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use atlas_core::Invoice;

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: String,
    sale_order_id: String,
    created_at: DateTime<Utc>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Invoice {
            id: row.id,
            sale_order_id: row.sale_order_id,
            created_at: row.created_at,
        }
    }
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Creates the invoice for a sale order.
    ///
    /// A second attempt for the same order fails with a unique violation.
    pub async fn create(&self, sale_order_id: &str) -> DbResult<Invoice> {
        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            sale_order_id: sale_order_id.to_string(),
            created_at: Utc::now(),
        };

        debug!(id = %invoice.id, sale_order_id = %sale_order_id, "creating invoice");

        sqlx::query(
            r#"
            INSERT INTO invoices (id, sale_order_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.sale_order_id)
        .bind(invoice.created_at)
        .execute(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets the invoice for a sale order, if one exists.
    pub async fn get_by_sale_order(&self, sale_order_id: &str) -> DbResult<Option<Invoice>> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            "SELECT id, sale_order_id, created_at FROM invoices WHERE sale_order_id = ?1",
        )
        .bind(sale_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Invoice::from))
    }

    /// Counts invoices referencing a sale order (0 or 1 by construction;
    /// exists so tests can assert exactly-once without trusting the index).
    pub async fn count_for_sale_order(&self, sale_order_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE sale_order_id = ?1")
                .bind(sale_order_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use atlas_core::{Company, NewSaleOrder, OrderStatus};

    async fn seeded_order_id(db: &Database) -> String {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: "Test Traders".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.companies().insert(&company).await.unwrap();

        let order = db
            .sale_orders()
            .insert(&NewSaleOrder {
                user_id: Uuid::new_v4().to_string(),
                company_id: company.id,
                status: OrderStatus::Pending,
                line_items: vec![],
                total_cents: 0,
            })
            .await
            .unwrap();
        order.id
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order_id = seeded_order_id(&db).await;

        let invoice = db.invoices().create(&order_id).await.unwrap();
        assert_eq!(invoice.sale_order_id, order_id);

        let found = db.invoices().get_by_sale_order(&order_id).await.unwrap();
        assert_eq!(found.unwrap().id, invoice.id);
    }

    #[tokio::test]
    async fn test_second_invoice_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order_id = seeded_order_id(&db).await;

        db.invoices().create(&order_id).await.unwrap();
        let second = db.invoices().create(&order_id).await;

        assert!(matches!(second, Err(DbError::UniqueViolation { .. })));
        assert_eq!(
            db.invoices().count_for_sale_order(&order_id).await.unwrap(),
            1
        );
    }
}
