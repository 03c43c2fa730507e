//! Server configuration.
//!
//! Settings come from three layers, highest precedence first:
//! command-line flags (or their environment variables), an optional TOML
//! file, and built-in defaults. Database credentials and the CORS origin
//! are not configured here; they are secrets resolved at startup from the
//! selected [`SecretSource`].
//!
//! Before any of that, an optional `.env` file in the working directory is
//! loaded into the process environment. Variables already set win.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use visitor_log_store::settings::DATABASE_KEYS;
use visitor_log_store::{PoolSettings, TlsMode, TlsPolicy};

use crate::echo::DEFAULT_ECHO_URL;
use crate::{Error, Result};

/// Secret key holding the allowed browser origin.
pub const CORS_ORIGIN: &str = "CORS_ORIGIN";

/// Origin allowed when the environment does not name one.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Listening port when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Parameter-store path prefix when none is configured.
pub const DEFAULT_PARAMETER_PREFIX: &str = "/visitor-log";

/// Optional file of `KEY=value` lines read at startup.
pub const ENV_FILE: &str = ".env";

/// Load `path` into the process environment without overriding variables
/// that are already set.
///
/// Returns `Ok(false)` when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(Error::config(format!(
            "cannot load environment file {}: {e}",
            path.display()
        ))),
    }
}

/// Where startup secrets come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretSource {
    /// Process environment (`PGHOST`, `PGUSER`, ...).
    #[default]
    Env,
    /// AWS SSM Parameter Store (`<prefix>/PGHOST`, ...).
    Ssm,
}

// ============================================================================
// CLI
// ============================================================================

/// Visitor log backend
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "visitor-log")]
#[command(about = "Visitor log REST backend", long_about = None, version)]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "VISITOR_LOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "LISTEN_HOST")]
    pub host: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Where to read database credentials and the CORS origin from
    #[arg(long, env = "SECRET_SOURCE", value_enum)]
    pub secret_source: Option<SecretSource>,

    /// Parameter-store path prefix (with `--secret-source ssm`)
    #[arg(long, env = "PARAMETER_PREFIX")]
    pub parameter_prefix: Option<String>,

    /// TLS mode for database connections
    #[arg(long, env = "PGSSLMODE")]
    pub db_ssl_mode: Option<TlsMode>,

    /// PEM bundle of trusted database CA certificates
    #[arg(long, env = "PGSSLROOTCERT")]
    pub db_ssl_root_cert: Option<PathBuf>,

    /// Maximum pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS")]
    pub db_max_connections: Option<u32>,

    /// IP echo endpoint used by `/check-ip`
    #[arg(long, env = "ECHO_URL")]
    pub echo_url: Option<String>,

    /// Include underlying error messages in 500 responses
    #[arg(long, env = "EXPOSE_ERROR_DETAILS", action = ArgAction::SetTrue)]
    pub expose_error_details: bool,
}

// ============================================================================
// File
// ============================================================================

/// Contents of the optional TOML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Address to listen on.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Secret source.
    pub secret_source: Option<SecretSource>,
    /// Parameter-store path prefix.
    pub parameter_prefix: Option<String>,
    /// Database TLS mode.
    pub db_ssl_mode: Option<TlsMode>,
    /// Database CA bundle.
    pub db_ssl_root_cert: Option<PathBuf>,
    /// Maximum pooled connections.
    pub db_max_connections: Option<u32>,
    /// IP echo endpoint.
    pub echo_url: Option<String>,
    /// Include error details in 500 responses.
    pub expose_error_details: Option<bool>,
}

impl FileConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("invalid config file: {e}")))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }
}

// ============================================================================
// Resolved
// ============================================================================

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub host: IpAddr,
    /// Port to listen on (`0` picks a free port).
    pub port: u16,
    /// Where secrets come from.
    pub secret_source: SecretSource,
    /// Parameter-store path prefix.
    pub parameter_prefix: String,
    /// Database TLS policy.
    pub tls: TlsPolicy,
    /// Pool sizing.
    pub pool: PoolSettings,
    /// IP echo endpoint.
    pub echo_url: String,
    /// Include error details in 500 responses.
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::merge(&Args::default(), FileConfig::default())
    }
}

impl ServerConfig {
    /// Resolve from parsed arguments, loading the config file they name.
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config file");
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    /// Layer arguments over file values over defaults.
    pub fn merge(args: &Args, file: FileConfig) -> Self {
        let mut tls = TlsPolicy::new(args.db_ssl_mode.or(file.db_ssl_mode).unwrap_or_default());
        if let Some(path) = args.db_ssl_root_cert.clone().or(file.db_ssl_root_cert) {
            tls = tls.with_root_cert(path);
        }

        let mut pool = PoolSettings::default();
        if let Some(max) = args.db_max_connections.or(file.db_max_connections) {
            pool.max_connections = max;
        }

        Self {
            host: args
                .host
                .or(file.host)
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            secret_source: args.secret_source.or(file.secret_source).unwrap_or_default(),
            parameter_prefix: args
                .parameter_prefix
                .clone()
                .or(file.parameter_prefix)
                .unwrap_or_else(|| DEFAULT_PARAMETER_PREFIX.to_string()),
            tls,
            pool,
            echo_url: args
                .echo_url
                .clone()
                .or(file.echo_url)
                .unwrap_or_else(|| DEFAULT_ECHO_URL.to_string()),
            expose_error_details: args.expose_error_details
                || file.expose_error_details.unwrap_or(false),
        }
    }

    /// The address the listener binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Secret names to request from the provider.
    ///
    /// The environment backend takes bare keys; the parameter store takes
    /// `<prefix>/<KEY>` paths.
    pub fn secret_names(&self) -> Vec<String> {
        let keys = DATABASE_KEYS.iter().copied().chain([CORS_ORIGIN]);
        match self.secret_source {
            SecretSource::Env => keys.map(str::to_string).collect(),
            SecretSource::Ssm => {
                let prefix = self.parameter_prefix.trim_end_matches('/');
                keys.map(|key| format!("{prefix}/{key}")).collect()
            }
        }
    }
}
