//! Connection settings resolved from secrets.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use visitor_log_secrets::SecretMap;

use crate::Result;

/// Database host.
pub const DB_HOST: &str = "PGHOST";
/// Database user.
pub const DB_USER: &str = "PGUSER";
/// Database name.
pub const DB_NAME: &str = "PGDATABASE";
/// Database password.
pub const DB_PASSWORD: &str = "PGPASSWORD";
/// Database port.
pub const DB_PORT: &str = "PGPORT";

/// Every secret key [`DatabaseSettings::from_secrets`] reads.
pub const DATABASE_KEYS: [&str; 5] = [DB_HOST, DB_USER, DB_NAME, DB_PASSWORD, DB_PORT];

// ============================================================================
// TLS
// ============================================================================

/// How the client negotiates TLS with the server.
///
/// Mirrors libpq's `sslmode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TlsMode {
    /// Plain TCP only.
    Disable,
    /// Plain TCP unless the server insists on TLS, no certificate checks.
    Allow,
    /// TLS if the server offers it, no certificate checks.
    Prefer,
    /// TLS required, no certificate checks.
    Require,
    /// TLS required, certificate chain checked against the root store.
    VerifyCa,
    /// TLS required, chain and host name checked.
    #[default]
    VerifyFull,
}

impl TlsMode {
    /// The libpq spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }

    /// Whether the server certificate is validated.
    pub fn verifies_certificate(&self) -> bool {
        matches!(self, Self::VerifyCa | Self::VerifyFull)
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TlsMode {
    type Err = visitor_log_core::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            other => Err(visitor_log_core::Error::config(format!(
                "unknown TLS mode '{other}' (expected disable, allow, prefer, require, verify-ca or verify-full)"
            ))),
        }
    }
}

impl From<TlsMode> for PgSslMode {
    fn from(mode: TlsMode) -> Self {
        match mode {
            TlsMode::Disable => PgSslMode::Disable,
            TlsMode::Allow => PgSslMode::Allow,
            TlsMode::Prefer => PgSslMode::Prefer,
            TlsMode::Require => PgSslMode::Require,
            TlsMode::VerifyCa => PgSslMode::VerifyCa,
            TlsMode::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

/// TLS trust policy for database connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsPolicy {
    /// Negotiation and verification mode.
    pub mode: TlsMode,
    /// PEM bundle of trusted roots (e.g. the cloud provider's CA bundle).
    pub root_cert: Option<PathBuf>,
}

impl TlsPolicy {
    /// Policy with the given mode and no extra roots.
    pub fn new(mode: TlsMode) -> Self {
        Self {
            mode,
            root_cert: None,
        }
    }

    /// Trust the roots in `path` in addition to the built-in store.
    pub fn with_root_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_cert = Some(path.into());
        self
    }
}

// ============================================================================
// DatabaseSettings
// ============================================================================

/// Everything needed to reach the database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Server host name or address.
    pub host: String,
    /// Login role.
    pub user: String,
    /// Database name.
    pub database: String,
    /// Login password.
    pub password: String,
    /// Server port.
    pub port: u16,
    /// TLS trust policy.
    pub tls: TlsPolicy,
}

impl DatabaseSettings {
    /// Build settings from resolved secrets.
    ///
    /// Reads every key in [`DATABASE_KEYS`]; a non-numeric port is a
    /// configuration error.
    pub fn from_secrets(secrets: &SecretMap, tls: TlsPolicy) -> Result<Self> {
        let raw_port = secrets.require(DB_PORT)?;
        let port = raw_port.trim().parse::<u16>().map_err(|_| {
            visitor_log_core::Error::config(format!("{DB_PORT} is not a valid port: '{raw_port}'"))
        })?;

        Ok(Self {
            host: secrets.require(DB_HOST)?.to_string(),
            user: secrets.require(DB_USER)?.to_string(),
            database: secrets.require(DB_NAME)?.to_string(),
            password: secrets.require(DB_PASSWORD)?.to_string(),
            port,
            tls,
        })
    }

    /// Driver connection options for these settings.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(self.tls.mode.into());

        match &self.tls.root_cert {
            Some(path) => options.ssl_root_cert(path),
            None => options,
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("tls", &self.tls)
            .finish()
    }
}

// ============================================================================
// PoolSettings
// ============================================================================

/// Pool sizing. Anything left unset uses the driver's defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// How long a request waits for a free connection.
    pub acquire_timeout: Option<Duration>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: None,
        }
    }
}
