// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::poller::spawn_poller;
use crate::application::refresh_client::DashboardRefreshClient;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_overview_source::HttpOverviewSource;
use crate::presentation::app_state::AppState;
use crate::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create overview source (infrastructure layer)
    let source = Arc::new(HttpOverviewSource::new(&app_config.backend)?);

    // Create refresh client (application layer)
    let client = Arc::new(DashboardRefreshClient::new(
        source,
        app_config.dashboard.refresh_settings(),
    ));

    // First load runs in the background so the page is served as "loading" meanwhile
    tokio::spawn({
        let client = client.clone();
        async move {
            let state = client.load(false).await;
            tracing::info!("Initial SBC overview load finished in state {}", state.name());
        }
    });
    let _poller = spawn_poller(client.clone(), app_config.dashboard.poll_interval());

    // Build router (presentation layer)
    let router = router(Arc::new(AppState { client }));

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind address {}", app_config.server.bind))?;
    tracing::info!(
        "Starting sbc-dashboard on {} (backend {})",
        addr,
        app_config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
