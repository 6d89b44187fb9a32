mod config;
mod models;
mod routes;
mod services;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::DiscoveryService;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub discovery: DiscoveryService,
    pub start_time: Instant,
}

/// Build the HTTP router with middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/ready", get(routes::health::ready))
        .route("/live", get(routes::health::live))
        // Stream lookups
        .route(
            "/api/streams/:content_type/:external_id",
            get(routes::streams::get_streams),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamscout_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting StreamScout Server v{}", env!("CARGO_PKG_VERSION"));

    // Build the provider set and pipeline
    let discovery = DiscoveryService::from_config(&config)?;
    let providers = discovery.provider_names();
    if providers.is_empty() {
        tracing::warn!("No stream providers enabled; every lookup will be empty");
    } else {
        tracing::info!("Stream providers enabled: {}", providers.join(", "));
    }
    tracing::info!(
        "Anime endpoint: {}, round delay: {}ms, provider timeout: {}ms",
        if config.anime_endpoint_enabled { "enabled" } else { "disabled" },
        config.variant_round_delay_ms,
        config.provider_timeout_ms
    );

    // Build application state
    let state = Arc::new(AppState {
        config,
        discovery,
        start_time: Instant::now(),
    });

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
