//! Prize proposal service — entry point.
//!
//! Users submit prize proposals, administrators approve them, and a paginated
//! REST API serves both to the web frontend. State lives in SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod pagination;
mod store;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::SignedTokenVerifier;
use config::Config;
use store::ProposalStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load optional .env file (ignored if missing) before RUST_LOG is read.
    let _ = dotenvy::dotenv();

    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config.database_url).await?;

    if config.admin_user_ids.is_empty() {
        info!("ADMIN_USER_IDS not set; any authenticated caller may approve proposals");
    }

    let state = Arc::new(api::ApiState {
        store: ProposalStore::new(pool),
        verifier: Arc::new(SignedTokenVerifier::new(&config.auth_secret)?),
        admin_user_ids: config.admin_user_ids.clone(),
    });
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
