//! PostgreSQL-backed visitor store.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use visitor_log_core::{Visitor, VisitorName};

use crate::{Result, VisitorStore, init_schema};

const INSERT_VISITOR: &str =
    "INSERT INTO visitors (name) VALUES ($1) RETURNING id, name, created_at";

const LIST_VISITORS: &str = "SELECT id, name, created_at FROM visitors \
     ORDER BY created_at DESC NULLS LAST, id DESC";

/// Row as stored. Tables created before `created_at` became `NOT NULL`
/// may still hold nulls.
#[derive(Debug, sqlx::FromRow)]
struct VisitorRow {
    id: i32,
    name: String,
    created_at: Option<NaiveDateTime>,
}

impl From<VisitorRow> for Visitor {
    fn from(row: VisitorRow) -> Self {
        Visitor {
            id: row.id,
            name: row.name,
            created_at: row.created_at.unwrap_or(NaiveDateTime::MIN),
        }
    }
}

/// Visitor store over the shared connection pool.
#[derive(Clone, Debug)]
pub struct PgVisitorStore {
    pool: PgPool,
}

impl PgVisitorStore {
    /// Wrap the process-wide pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VisitorStore for PgVisitorStore {
    async fn init(&self) -> Result<()> {
        init_schema(&self.pool).await.map(|_| ())
    }

    async fn add(&self, name: &VisitorName) -> Result<Visitor> {
        let row: VisitorRow = sqlx::query_as(INSERT_VISITOR)
            .bind(name.as_str())
            .fetch_one(&self.pool)
            .await?;
        tracing::debug!(id = row.id, "Visitor inserted");
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Visitor>> {
        let rows: Vec<VisitorRow> = sqlx::query_as(LIST_VISITORS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Visitor::from).collect())
    }
}
