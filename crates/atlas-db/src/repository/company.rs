//! # Company Repository
//!
//! Company management is owned by an external collaborator; the order
//! backend only needs existence lookups (order creation checks the target
//! company) and inserts for seeding and tests.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use atlas_core::Company;

#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for company lookups.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Gets a company by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Company>> {
        let row: Option<CompanyRow> =
            sqlx::query_as("SELECT id, name, created_at, updated_at FROM companies WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Company::from))
    }

    /// Inserts a company (seeding and tests).
    pub async fn insert(&self, company: &Company) -> DbResult<()> {
        debug!(id = %company.id, name = %company.name, "inserting company");

        sqlx::query(
            r#"
            INSERT INTO companies (id, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&company.id)
        .bind(&company.name)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: "Test Traders".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.companies().insert(&company).await.unwrap();

        let found = db.companies().get_by_id(&company.id).await.unwrap();
        assert_eq!(found.unwrap().name, "Test Traders");

        let missing = db
            .companies()
            .get_by_id(&Uuid::new_v4().to_string())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
