//! Ordered, one-shot startup.
//!
//! Stages run strictly in sequence:
//! secrets → pool → schema → routes → listener. The first failure aborts
//! startup and is reported as [`Error::Startup`] carrying the stage.
//! Nothing is retried.

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio::net::TcpListener;
use visitor_log_secrets::{EnvSecretProvider, SecretProvider};
use visitor_log_store::settings::DB_PORT;
use visitor_log_store::{DatabaseSettings, PgVisitorStore, VisitorStore, connect_lazy};

use crate::config::{CORS_ORIGIN, DEFAULT_CORS_ORIGIN, SecretSource, ServerConfig};
use crate::cors::cors_layer;
use crate::echo::{HttpIpEcho, IpEcho};
use crate::routes::{AppState, app};
use crate::{Error, Result};

/// Port used when the environment does not name one.
const DEFAULT_DB_PORT: &str = "5432";

/// One step of the startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartupStage {
    /// Fetch credentials and the CORS origin.
    Secrets,
    /// Build the connection pool.
    Pool,
    /// Create the table and probe the database.
    Schema,
    /// Assemble the router.
    Routes,
    /// Bind the TCP listener.
    Listener,
}

impl StartupStage {
    /// Stage name as it appears in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secrets => "secrets",
            Self::Pool => "pool",
            Self::Schema => "schema",
            Self::Routes => "routes",
            Self::Listener => "listener",
        }
    }
}

impl fmt::Display for StartupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run one stage, logging timing and tagging any failure with `stage`.
async fn run_stage<T, F>(stage: StartupStage, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tracing::debug!(%stage, "Starting stage");
    let started = Instant::now();
    match fut.await {
        Ok(value) => {
            tracing::info!(
                %stage,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Stage complete"
            );
            Ok(value)
        }
        Err(e) => {
            tracing::error!(%stage, error = %e, "Stage failed");
            Err(Error::Startup {
                stage,
                source: Box::new(e),
            })
        }
    }
}

// ============================================================================
// Secret source
// ============================================================================

/// Build the provider selected by `config.secret_source`.
pub async fn secret_provider(config: &ServerConfig) -> Result<Box<dyn SecretProvider>> {
    match config.secret_source {
        SecretSource::Env => Ok(Box::new(
            EnvSecretProvider::new()
                .with_default(DB_PORT, DEFAULT_DB_PORT)
                .with_default(CORS_ORIGIN, DEFAULT_CORS_ORIGIN),
        )),
        #[cfg(feature = "aws-ssm")]
        SecretSource::Ssm => Ok(Box::new(
            visitor_log_secrets::SsmSecretProvider::from_env().await,
        )),
        #[cfg(not(feature = "aws-ssm"))]
        SecretSource::Ssm => Err(Error::config(
            "secret source 'ssm' requires the aws-ssm feature",
        )),
    }
}

// ============================================================================
// Stages
// ============================================================================

/// Run every startup stage against PostgreSQL.
pub async fn bootstrap(config: &ServerConfig, provider: &dyn SecretProvider) -> Result<App> {
    tracing::info!(source = provider.name(), "Resolving secrets");
    let names = config.secret_names();
    let secrets = run_stage(StartupStage::Secrets, async {
        Ok::<_, Error>(provider.fetch(&names).await?)
    })
    .await?;

    let (store, cors_origin) = run_stage(StartupStage::Pool, async {
        let settings = DatabaseSettings::from_secrets(&secrets, config.tls.clone())?;
        let origin = secrets.require(CORS_ORIGIN)?.to_string();
        tracing::debug!(
            host = %settings.host,
            database = %settings.database,
            tls = %settings.tls.mode,
            "Database settings resolved"
        );
        let pool = connect_lazy(&settings, &config.pool);
        Ok::<_, Error>((PgVisitorStore::new(pool), origin))
    })
    .await?;

    let echo = HttpIpEcho::new(config.echo_url.clone());
    launch(config, Arc::new(store), Arc::new(echo), &cors_origin).await
}

/// Run the stages after the pool exists: schema, routes, listener.
///
/// The listener is bound only once the schema check has passed.
pub async fn launch(
    config: &ServerConfig,
    store: Arc<dyn VisitorStore>,
    echo: Arc<dyn IpEcho>,
    cors_origin: &str,
) -> Result<App> {
    run_stage(StartupStage::Schema, async {
        Ok::<_, Error>(store.init().await?)
    })
    .await?;

    let router = run_stage(StartupStage::Routes, async {
        let cors = cors_layer(cors_origin)?;
        let state = AppState::new(store, echo).with_error_details(config.expose_error_details);
        Ok::<_, Error>(app(state, cors))
    })
    .await?;

    let listener = run_stage(StartupStage::Listener, async {
        Ok::<_, Error>(TcpListener::bind(config.socket_addr()).await?)
    })
    .await?;

    Ok(App { listener, router })
}

// ============================================================================
// App
// ============================================================================

/// A bound listener plus the router it will serve.
#[derive(Debug)]
pub struct App {
    listener: TcpListener,
    router: Router,
}

impl App {
    /// The address actually bound (useful with port `0`).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// The assembled router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
