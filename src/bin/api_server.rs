// API Server Binary Entry Point
//
// Purpose: Start the Axum server over the remote geospatial engine
// Usage: cargo run --bin api_server

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use windsite_scorer::{create_router, AppState, EngineConfig, HttpEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Default log level: info for our crate, warn for others
                "windsite_scorer=info,tower_http=debug,axum=debug,warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let engine_url =
        std::env::var("ENGINE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let engine_project = std::env::var("ENGINE_PROJECT").unwrap_or_else(|_| "windsite".to_string());
    let engine_api_key = std::env::var("ENGINE_API_KEY").unwrap_or_default();

    tracing::info!("Configuration:");
    tracing::info!("  DATA_DIR: {}", data_dir.display());
    tracing::info!("  PORT: {}", port);
    tracing::info!("  ENGINE_URL: {}", engine_url);
    tracing::info!("  ENGINE_PROJECT: {}", engine_project);

    // One authenticated engine session per process, health-checked up front
    tracing::info!("Connecting to geospatial compute engine...");
    let config = EngineConfig::new(&engine_url, &engine_project, &engine_api_key);
    let engine = HttpEngine::connect(&config).await?;
    tracing::info!("Engine session established");

    // Initialize application state (store, artifact writer, cache)
    let state = AppState::new(engine, &data_dir)?;
    let engine_handle = state.engine.clone();

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Explicit engine session teardown on shutdown
    tracing::info!("Shutting down; closing engine session");
    if let Err(e) = engine_handle.close().await {
        tracing::warn!(error = %e, "engine session teardown failed");
    }

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
}
