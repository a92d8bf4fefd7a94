//! propsearch server entry point.
//!
//! Loads configuration, opens the property store and geocode cache, then
//! serves the HTTP API until ctrl-c. Logs are JSON on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use propsearch_client::{GeocodeClient, GeocodeConfig};
use propsearch_core::{AppConfig, Database, NearbySearch, SqliteGeocodeCache};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod routes;
mod sweeper;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = Database::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;

    let cache_db = match &config.cache_db_path {
        Some(path) => Database::open(path)
            .await
            .with_context(|| format!("failed to open geocode cache at {}", path.display()))?,
        None => db.clone(),
    };
    let cache = SqliteGeocodeCache::new(cache_db, config.geocode_cache_ttl());

    if let Some(interval) = config.cache_sweep_interval() {
        sweeper::spawn(cache.database().clone(), interval);
    }

    let geocoder = GeocodeClient::new(GeocodeConfig::from(&config)).context("failed to build geocoding client")?;
    let search = NearbySearch::new(db.clone(), Arc::new(cache), Arc::new(geocoder));
    let app = handler::router(handler::AppState::new(db, search, config.default_radius_km));

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!(
        addr = %config.listen_addr,
        geocoder = %config.geocode_base_url,
        "Starting propsearch server"
    );

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("propsearch server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
