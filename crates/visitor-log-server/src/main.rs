//! Visitor log backend entry point.

use std::path::Path;

use clap::Parser;
use visitor_log_server::config::{ENV_FILE, load_env_file};
use visitor_log_server::{Args, ServerConfig, bootstrap, secret_provider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before clap and the secret provider read the environment
    let env_file = load_env_file(Path::new(ENV_FILE));

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,visitor_log=debug".into()),
        )
        .init();

    match env_file {
        Ok(true) => tracing::debug!(path = ENV_FILE, "Loaded environment file"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring environment file"),
    }

    let args = Args::parse();
    let config = ServerConfig::resolve(&args)?;
    tracing::debug!(?config, "Configuration resolved");

    let provider = secret_provider(&config).await?;
    let app = match bootstrap(&config, provider.as_ref()).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Server listening on port {}", app.local_addr()?.port());
    app.serve().await?;
    Ok(())
}
