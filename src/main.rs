//! Discharge Compass API server

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use discharge_compass::{config::Config, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "discharge_compass=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Discharge Compass starting...");
    tracing::info!("Artifacts: {}", config.artifact_dir.display());
    tracing::info!(
        "Risk tiers: low < {} <= medium < {} <= high",
        config.low_risk_threshold,
        config.high_risk_threshold
    );
    if config.rate_limit_enabled {
        tracing::info!("Rate limit: {} requests/minute per client", config.rate_limit_per_minute);
    }

    let port = config.port;
    let state = AppState::from_config(config).context("invalid configuration")?;

    // Warm the model so the first request does not pay for the load
    match state.service.artifacts().model() {
        Ok(model) => tracing::info!("Model ready (sha256 {})", model.checksum),
        Err(e) => tracing::warn!("{}; predictions will return 503 until it appears", e),
    }

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server error")?;

    Ok(())
}
