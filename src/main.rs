//! signup-gateway server entry point.
//!
//! Connects the record store, loads the event configuration and the
//! participant list, then serves the REST API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use signup_gateway::api;
use signup_gateway::app_state::{AppState, Stores};
use signup_gateway::config::{GatewayConfig, LogFormat};
use signup_gateway::notifier::{EmailJsNotifier, LogNotifier, Notifier};
use signup_gateway::persistence::{MemoryStore, PostgresStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting signup-gateway");

    // Build persistence layer
    let stores = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .context("connecting to PostgreSQL")?;
        let store = PostgresStore::new(pool);
        store.migrate().await.context("running migrations")?;
        tracing::info!("using PostgreSQL record store");
        Stores::single(Arc::new(store))
    } else {
        tracing::warn!("persistence disabled; records live in memory only");
        Stores::single(Arc::new(MemoryStore::new()))
    };

    // Build notifier
    let notifier: Arc<dyn Notifier> = match config.emailjs.clone() {
        Some(emailjs) => Arc::new(EmailJsNotifier::new(emailjs)?),
        None => {
            tracing::warn!("EmailJS not configured; notifications are logged only");
            Arc::new(LogNotifier)
        }
    };

    // Build application state
    let app_state = AppState::from_config(&config, stores, notifier)?;
    app_state.load().await.context("loading initial data")?;

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
