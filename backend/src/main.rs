//! BloomWatch Analytics Server
//!
//! Serves the bloom feature pipeline (derivation, classification,
//! forecasting, aggregation and CSV exchange) to the BloomWatch dashboards.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bloomwatch_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting BloomWatch Analytics Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        rolling_window = config.pipeline.rolling_window,
        soil_moisture_unit = ?config.pipeline.soil_moisture_unit,
        max_observations = config.pipeline.max_observations,
        "Pipeline configured"
    );

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| error::AppError::Configuration(format!("server.host: {}", e)))?;
    let addr = SocketAddr::from((host, config.server.port));

    // Create application state
    let state = AppState {
        config: Arc::new(config),
    };

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "BloomWatch Analytics API v1"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
