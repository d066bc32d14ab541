//! # Sale Order Repository
//!
//! Order rows with their embedded line-item document.
//!
//! ## Order Lifecycle (storage view)
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  1. INSERT                                                         │
//! │     insert(NewSaleOrder) → assigns sale_order_number + token_no    │
//! │                            (first persistence, exactly once)       │
//! │                                                                    │
//! │  2. LINE MUTATION (pending only)                                   │
//! │     update_lines() → rewrites the embedded document + total        │
//! │                                                                    │
//! │  3. TERMINAL FLIP                                                  │
//! │     complete() / cancel() → conditional status update; the         │
//! │     predicate makes a concurrent double-flip lose (0 rows)         │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::sequence::SequenceRepository;
use atlas_core::{LineItem, NewSaleOrder, OrderStatus, SaleOrder};

/// Row shape for `sale_orders`; the line-item document is stored as JSON
/// text and parsed on the way out.
#[derive(sqlx::FromRow)]
struct SaleOrderRow {
    id: String,
    sale_order_number: String,
    token_no: String,
    user_id: String,
    company_id: String,
    status: OrderStatus,
    line_items: String,
    total_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleOrderRow {
    fn into_order(self) -> DbResult<SaleOrder> {
        let line_items: Vec<LineItem> = serde_json::from_str(&self.line_items)?;

        Ok(SaleOrder {
            id: self.id,
            sale_order_number: self.sale_order_number,
            token_no: self.token_no,
            user_id: self.user_id,
            company_id: self.company_id,
            status: self.status,
            line_items,
            total_cents: self.total_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, sale_order_number, token_no, user_id, company_id, status, \
     line_items, total_cents, created_at, updated_at";

/// Repository for sale-order database operations.
#[derive(Debug, Clone)]
pub struct SaleOrderRepository {
    pool: SqlitePool,
}

impl SaleOrderRepository {
    /// Creates a new SaleOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleOrderRepository { pool }
    }

    /// Persists a new order, assigning its business numbers.
    ///
    /// This is the single first-persistence point: [`NewSaleOrder`] carries
    /// no numbers, so `sale_order_number` and `token_no` are drawn from the
    /// sequence counters here, exactly once, and never rewritten afterwards.
    pub async fn insert(&self, new: &NewSaleOrder) -> DbResult<SaleOrder> {
        let now = Utc::now();

        let sale_order_number =
            SequenceRepository::next_sale_order_number_on(&self.pool).await?;
        let token_no =
            SequenceRepository::next_token_number_on(&self.pool, now.date_naive()).await?;

        let order = SaleOrder {
            id: Uuid::new_v4().to_string(),
            sale_order_number,
            token_no,
            user_id: new.user_id.clone(),
            company_id: new.company_id.clone(),
            status: new.status,
            line_items: new.line_items.clone(),
            total_cents: new.total_cents,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %order.id,
            sale_order_number = %order.sale_order_number,
            token_no = %order.token_no,
            "inserting sale order"
        );

        let line_items_json = serde_json::to_string(&order.line_items)?;

        sqlx::query(
            r#"
            INSERT INTO sale_orders (
                id, sale_order_number, token_no, user_id, company_id,
                status, line_items, total_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.sale_order_number)
        .bind(&order.token_no)
        .bind(&order.user_id)
        .bind(&order.company_id)
        .bind(order.status)
        .bind(&line_items_json)
        .bind(order.total_cents)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SaleOrder>> {
        Self::get_by_id_on(&self.pool, id).await
    }

    /// [`SaleOrderRepository::get_by_id`] against an arbitrary executor.
    pub async fn get_by_id_on<'e, E>(executor: E, id: &str) -> DbResult<Option<SaleOrder>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row: Option<SaleOrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM sale_orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        row.map(SaleOrderRow::into_order).transpose()
    }

    /// Rewrites an order's embedded line-item document and total.
    ///
    /// The `status = 'pending'` predicate makes this a no-op against an order
    /// that was finalized concurrently, which surfaces as NotFound rather
    /// than silently mutating a terminal order.
    pub async fn update_lines(
        &self,
        id: &str,
        line_items: &[LineItem],
        total_cents: i64,
    ) -> DbResult<()> {
        Self::update_lines_on(&self.pool, id, line_items, total_cents).await
    }

    /// [`SaleOrderRepository::update_lines`] against an arbitrary executor,
    /// for the revision transaction.
    pub async fn update_lines_on<'e, E>(
        executor: E,
        id: &str,
        line_items: &[LineItem],
        total_cents: i64,
    ) -> DbResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        debug!(id = %id, lines = line_items.len(), total_cents = %total_cents, "updating order lines");

        let line_items_json = serde_json::to_string(line_items)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sale_orders
            SET line_items = ?2, total_cents = ?3, updated_at = ?4
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(&line_items_json)
        .bind(total_cents)
        .bind(now)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale order (pending)", id));
        }

        Ok(())
    }

    /// Flips an order to `completed`.
    ///
    /// Returns `false` when the order was already completed (or does not
    /// exist) - the conditional predicate is what makes a concurrent
    /// double-complete race resolve to exactly one winner.
    pub async fn complete(&self, id: &str) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sale_orders
            SET status = 'completed', updated_at = ?2
            WHERE id = ?1 AND status != 'completed'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips a pending order to `cancelled`.
    ///
    /// Returns `false` when the order was not pending (or does not exist).
    pub async fn cancel(&self, id: &str) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sale_orders
            SET status = 'cancelled', updated_at = ?2
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
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

    async fn seed_company(db: &Database) -> Company {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: "Test Traders".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.companies().insert(&company).await.unwrap();
        company
    }

    fn new_order(company_id: &str, lines: Vec<LineItem>, total_cents: i64) -> NewSaleOrder {
        NewSaleOrder {
            user_id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            status: OrderStatus::Pending,
            line_items: lines,
            total_cents,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_numbers_once() {
        let db = test_db().await;
        let company = seed_company(&db).await;

        let first = db
            .sale_orders()
            .insert(&new_order(&company.id, vec![], 0))
            .await
            .unwrap();
        let second = db
            .sale_orders()
            .insert(&new_order(&company.id, vec![], 0))
            .await
            .unwrap();

        assert_eq!(first.sale_order_number, "SALEORD1");
        assert_eq!(second.sale_order_number, "SALEORD2");
        assert_eq!(first.token_no, "1");
        assert_eq!(second.token_no, "2");

        // Numbers never change after first persistence.
        db.sale_orders()
            .update_lines(&first.id, &[], 0)
            .await
            .unwrap();
        let reread = db.sale_orders().get_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(reread.sale_order_number, "SALEORD1");
        assert_eq!(reread.token_no, "1");
    }

    #[tokio::test]
    async fn test_line_document_roundtrip() {
        let db = test_db().await;
        let company = seed_company(&db).await;

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
        let order = db
            .sale_orders()
            .insert(&new_order(&company.id, lines.clone(), 500))
            .await
            .unwrap();

        let stored = db.sale_orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.line_items, lines);
        assert_eq!(stored.total_cents, 500);
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_complete_is_single_winner() {
        let db = test_db().await;
        let company = seed_company(&db).await;
        let order = db
            .sale_orders()
            .insert(&new_order(&company.id, vec![], 0))
            .await
            .unwrap();

        assert!(db.sale_orders().complete(&order.id).await.unwrap());
        assert!(!db.sale_orders().complete(&order.id).await.unwrap());

        let stored = db.sale_orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_cancel_requires_pending() {
        let db = test_db().await;
        let company = seed_company(&db).await;
        let order = db
            .sale_orders()
            .insert(&new_order(&company.id, vec![], 0))
            .await
            .unwrap();

        assert!(db.sale_orders().cancel(&order.id).await.unwrap());
        assert!(!db.sale_orders().cancel(&order.id).await.unwrap());

        let stored = db.sale_orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_update_lines_rejects_terminal_order() {
        let db = test_db().await;
        let company = seed_company(&db).await;
        let order = db
            .sale_orders()
            .insert(&new_order(&company.id, vec![], 0))
            .await
            .unwrap();

        db.sale_orders().complete(&order.id).await.unwrap();

        let result = db.sale_orders().update_lines(&order.id, &[], 100).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }
}
