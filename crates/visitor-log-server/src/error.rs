//! Error types for visitor-log-server

use thiserror::Error;

use crate::bootstrap::StartupStage;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from visitor-log-core
    #[error("Core error: {0}")]
    Core(#[from] visitor_log_core::Error),

    /// Error from visitor-log-secrets
    #[error("Secret error: {0}")]
    Secrets(#[from] visitor_log_secrets::Error),

    /// Error from visitor-log-store
    #[error("Store error: {0}")]
    Store(#[from] visitor_log_store::Error),

    /// I/O error (listener bind, config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An outbound call to a third-party service failed
    #[error("Upstream error: {message}")]
    Upstream {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// A startup stage failed; the process should exit
    #[error("Startup failed at stage '{stage}': {source}")]
    Startup {
        /// The stage that failed
        stage: StartupStage,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates an upstream error with a message.
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Error::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an upstream error with a message and source error.
    pub fn upstream_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Upstream {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// The failed startup stage, if this is a startup error.
    pub fn stage(&self) -> Option<StartupStage> {
        match self {
            Error::Startup { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
