//! Forecast project service entry point.
//!
//! Stores material demand forecasting projects in SQLite, asks the
//! forecasting model for demand figures on submission, and routes every
//! project through the state → central approval workflow over a small Axum
//! REST API.

mod activity;
mod api;
mod config;
mod db;
mod errors;
mod forecast;
mod models;
mod projects;
mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use reqwest::Client;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use forecast::ForecastClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    let jurisdictions = config
        .load_jurisdictions()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    info!(
        "Loaded jurisdiction table with {} states",
        jurisdictions.entries().len()
    );

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config.database_url).await?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.forecast_timeout_secs))
        .build()?;
    let forecaster = ForecastClient::new(
        client,
        config.forecast_url.clone(),
        config.forecast_max_retries,
    );
    match &config.forecast_url {
        Some(url) => info!("Forecasting model at {url}"),
        None => info!("FORECAST_URL not set; projects are stored without forecasts"),
    }

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState {
        pool,
        jurisdictions,
        forecaster,
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/jurisdictions", get(api::get_jurisdictions))
        .route("/auth/signup", post(api::signup))
        .route("/auth/profile", get(api::get_profile))
        .route(
            "/projects",
            get(api::get_projects).post(api::create_project),
        )
        .route(
            "/projects/:id",
            put(api::update_project).delete(api::delete_project),
        )
        .route("/activity", get(api::get_activity))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
