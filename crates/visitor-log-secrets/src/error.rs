//! Secret resolution errors.

/// Result type alias for secret resolution.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving secrets.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// One or more requested names were not supplied by the provider.
    #[error("missing secrets: {}", .names.join(", "))]
    Missing {
        /// Every requested name that could not be resolved.
        names: Vec<String>,
    },

    /// The provider itself failed (network, auth, throttling, ...).
    #[error("secret provider error: {message}")]
    Provider {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a provider error with a message.
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Error::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a provider error with a message and source error.
    pub fn provider_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Provider {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
