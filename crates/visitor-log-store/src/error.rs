//! Error types for visitor-log-store

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the store
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from visitor-log-core
    #[error("Core error: {0}")]
    Core(#[from] visitor_log_core::Error),

    /// A required database setting was not resolved
    #[error("Secret error: {0}")]
    Secrets(#[from] visitor_log_secrets::Error),

    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema creation or liveness probe failed
    #[error("Schema initialization failed ({step}): {source}")]
    Schema {
        /// Which statement failed
        step: &'static str,
        /// Underlying driver error
        #[source]
        source: sqlx::Error,
    },

    /// Store cannot serve requests
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
