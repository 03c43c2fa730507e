//! Schema initializer and liveness probe.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{Error, Result};

/// Idempotent table definition.
pub const CREATE_VISITORS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS visitors (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Trivial query proving the database answers.
pub const LIVENESS_PROBE: &str = "SELECT NOW()";

/// Ensure the `visitors` table exists, then run the liveness probe.
///
/// Returns the database server's clock reading.
pub async fn init_schema(pool: &PgPool) -> Result<DateTime<Utc>> {
    sqlx::query(CREATE_VISITORS_TABLE)
        .execute(pool)
        .await
        .map_err(|source| Error::Schema {
            step: "create table",
            source,
        })?;
    tracing::info!("Database initialized successfully");

    let now: DateTime<Utc> = sqlx::query_scalar(LIVENESS_PROBE)
        .fetch_one(pool)
        .await
        .map_err(|source| Error::Schema {
            step: "liveness probe",
            source,
        })?;
    tracing::info!(%now, "Database connected");

    Ok(now)
}
