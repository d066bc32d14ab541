//! # Sequence Repository
//!
//! Durable, collision-free counters for generated business numbers.
//!
//! ## How a counter advances
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  next("sale_order", "")                                            │
//! │                                                                    │
//! │  INSERT INTO sequence_counters (name, scope_key, value)            │
//! │  VALUES ('sale_order', '', 1)                                      │
//! │  ON CONFLICT (name, scope_key)                                     │
//! │      DO UPDATE SET value = value + 1                               │
//! │  RETURNING value                                                   │
//! │                                                                    │
//! │  One statement: first caller creates the row at 1, every later     │
//! │  caller increments and reads in the same operation. Two concurrent │
//! │  callers can never observe the same value.                         │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counters live in the database, never in process memory, so values stay
//! unique across restarts and across multiple instances sharing the store.
//!
//! Two sequences exist:
//! - `sale_order`, unscoped, rendered as `SALEORD{n}`
//! - `token_no`, scoped by UTC calendar day, rendered as the bare integer;
//!   a new day simply creates a new `(name, scope)` row, so there is no
//!   reset step to get wrong

use chrono::NaiveDate;
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use atlas_core::{SALE_ORDER_NUMBER_PREFIX, SALE_ORDER_SEQUENCE, TOKEN_SEQUENCE};

/// Repository for named, optionally scoped sequence counters.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    pool: SqlitePool,
}

impl SequenceRepository {
    /// Creates a new SequenceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SequenceRepository { pool }
    }

    /// Atomically increments the `(name, scope_key)` counter and returns the
    /// new value.
    pub async fn next(&self, name: &str, scope_key: &str) -> DbResult<i64> {
        Self::next_on(&self.pool, name, scope_key).await
    }

    /// [`SequenceRepository::next`] against an arbitrary executor.
    pub async fn next_on<'e, E>(executor: E, name: &str, scope_key: &str) -> DbResult<i64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sequence_counters (name, scope_key, value)
            VALUES (?1, ?2, 1)
            ON CONFLICT (name, scope_key)
                DO UPDATE SET value = value + 1
            RETURNING value
            "#,
        )
        .bind(name)
        .bind(scope_key)
        .fetch_one(executor)
        .await?;

        debug!(name = %name, scope = %scope_key, value = %value, "sequence advanced");

        Ok(value)
    }

    /// Next sale-order number, formatted `SALEORD{n}`.
    pub async fn next_sale_order_number(&self) -> DbResult<String> {
        Self::next_sale_order_number_on(&self.pool).await
    }

    /// [`SequenceRepository::next_sale_order_number`] against an executor.
    pub async fn next_sale_order_number_on<'e, E>(executor: E) -> DbResult<String>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let value = Self::next_on(executor, SALE_ORDER_SEQUENCE, "").await?;
        Ok(format!("{SALE_ORDER_NUMBER_PREFIX}{value}"))
    }

    /// Next token number for `day`, formatted as the bare integer.
    pub async fn next_token_number(&self, day: NaiveDate) -> DbResult<String> {
        Self::next_token_number_on(&self.pool, day).await
    }

    /// [`SequenceRepository::next_token_number`] against an executor.
    pub async fn next_token_number_on<'e, E>(executor: E, day: NaiveDate) -> DbResult<String>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let scope_key = day.format("%Y-%m-%d").to_string();
        let value = Self::next_on(executor, TOKEN_SEQUENCE, &scope_key).await?;
        Ok(value.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_counter_starts_at_one_and_increments() {
        let db = test_db().await;
        let sequences = db.sequences();

        assert_eq!(sequences.next("sale_order", "").await.unwrap(), 1);
        assert_eq!(sequences.next("sale_order", "").await.unwrap(), 2);
        assert_eq!(sequences.next("sale_order", "").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_scopes_are_independent() {
        let db = test_db().await;
        let sequences = db.sequences();

        assert_eq!(sequences.next("token_no", "2026-08-06").await.unwrap(), 1);
        assert_eq!(sequences.next("token_no", "2026-08-06").await.unwrap(), 2);

        // A new day starts a new counter row.
        assert_eq!(sequences.next("token_no", "2026-08-07").await.unwrap(), 1);

        // And so does a different name under the same scope.
        assert_eq!(sequences.next("sale_order", "").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_number_formats() {
        let db = test_db().await;
        let sequences = db.sequences();

        assert_eq!(sequences.next_sale_order_number().await.unwrap(), "SALEORD1");
        assert_eq!(sequences.next_sale_order_number().await.unwrap(), "SALEORD2");

        let day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(sequences.next_token_number(day).await.unwrap(), "1");
        assert_eq!(sequences.next_token_number(day).await.unwrap(), "2");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_increments_are_distinct() {
        let db = test_db().await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let sequences = db.sequences();
            handles.push(tokio::spawn(async move {
                sequences.next("sale_order", "").await.unwrap()
            }));
        }

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await.unwrap());
        }

        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), 16, "concurrent callers saw a duplicate value");
    }
}
