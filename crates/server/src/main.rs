//! Security dashboard server binary.
//!
//! Standalone HTTP service that aggregates GitHub security alerts across
//! the configured repositories.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use secdash_alerts::providers::{AlertProvider, GithubAlertProvider, GithubClient};
use secdash_alerts::Config;

mod server;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("secdash_server=info".parse()?)
                .add_directive("secdash_alerts=info".parse()?),
        )
        .init();

    info!("Starting security dashboard server...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        repositories = config.repositories.len(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Configuration loaded"
    );

    // Initialize the GitHub provider
    let client = GithubClient::new(config.github_token.clone())
        .context("Failed to create GitHub client")?;
    let provider: Arc<dyn AlertProvider> =
        Arc::new(GithubAlertProvider::new(client, config.cache_ttl));

    // Build application state
    let state = server::AppState {
        config: config.clone(),
        provider,
    };

    // Build router
    let app = server::build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(port = config.port, "Security dashboard listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
