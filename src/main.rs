mod config;
mod errors;
mod models;
mod relay;
mod routes;
mod service;
mod upstream;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::routes::build_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_relay=debug,tower_http=debug".into()),
        )
        .init();

    // ── Configuration ─────────────────────────────────────────────────────────
    let config = AppConfig::from_env();
    if config.api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not set; chat requests will fail until it is provided");
    }
    info!(
        upstream = %config.completions_url(),
        model = %config.model,
        "Relay configured"
    );
    let port = config.port;

    // ── Router ────────────────────────────────────────────────────────────────
    let app = build_app(Arc::new(config));

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
