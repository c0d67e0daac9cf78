// API server binary entry point
//
// Purpose: Start the Axum API server for the farming assistant
// Usage: cargo run --bin api_server

use farm_assistant::{create_router, AppState, ServerConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "farm_assistant=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let config = ServerConfig::from_env();
    let port = config.port;

    tracing::info!("Configuration:");
    tracing::info!("  PORT: {}", port);
    tracing::info!("  GEMINI_MODEL: {}", config.gemini_model);
    tracing::info!("  GEMINI_BASE_URL: {}", config.gemini_base_url);
    tracing::info!("  MODEL_TIMEOUT_SECS: {}", config.model_timeout.as_secs());
    tracing::info!("  CORS_ORIGINS: {}", config.cors_origins.join(","));
    tracing::info!("  CACHE_TTL_SECS: {}", config.cache_ttl.as_secs());

    let state = AppState::new(config)?;
    tracing::info!("Application state initialized successfully");

    // Create router with all endpoints and middleware
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
