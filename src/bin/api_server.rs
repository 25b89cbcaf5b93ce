// API Server Binary Entry Point
//
// Purpose: Load the model artifacts and serve the recommendation form + JSON API
// Usage: MODEL_DIR=./artifacts cargo run --bin api_server

use crop_recommender::{create_router, AppState, ServerConfig};
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
                    "crop_recommender=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = ServerConfig::from_env();
    tracing::info!("Configuration:");
    tracing::info!("  MODEL_DIR: {}", config.model_dir.display());
    tracing::info!("  MODEL_FILE: {}", config.model_file);
    tracing::info!("  SCALER_FILE: {}", config.scaler_file);
    tracing::info!("  PORT: {}", config.port);

    // A failed load is logged and leaves the server up in degraded mode
    let state = AppState::new(&config);
    if state.recommender.is_ready() {
        tracing::info!("Model and scaler loaded successfully");
    } else {
        tracing::warn!("Serving without a model; every prediction will return the load error");
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
