//! Connection pool factory.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::{DatabaseSettings, PoolSettings};

/// Build the process-wide pool.
///
/// Performs no I/O: connections are opened on first use, so connectivity
/// problems surface at [`init_schema`](crate::init_schema). Must be called
/// from within a Tokio runtime.
pub fn connect_lazy(settings: &DatabaseSettings, pool: &PoolSettings) -> PgPool {
    tracing::debug!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        tls = %settings.tls.mode,
        max_connections = pool.max_connections,
        "Building connection pool"
    );

    if !settings.tls.mode.verifies_certificate() {
        tracing::warn!(
            tls = %settings.tls.mode,
            "Database server certificate will not be verified"
        );
    }

    let mut options = PgPoolOptions::new().max_connections(pool.max_connections);
    if let Some(timeout) = pool.acquire_timeout {
        options = options.acquire_timeout(timeout);
    }
    options.connect_lazy_with(settings.connect_options())
}
