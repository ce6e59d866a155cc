mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting report API v{}", env!("CARGO_PKG_VERSION"));

    // The LLM client is built on the first report request.
    if config.anthropic_api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; report generation will fail until it is configured");
    }
    info!(
        "LLM model: {}, per-call timeout: {}s",
        config.llm_model,
        config.llm_timeout.as_secs()
    );
    match &config.prompt_audit_dir {
        Some(dir) => info!("Prompt audit log enabled at {}", dir.display()),
        None => info!("Prompt audit log disabled"),
    }

    let state = AppState::new(config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
