mod config;
mod editor;
mod errors;
mod generation;
mod llm_client;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::client::GeminiContentClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::{sweep_idle_sessions, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pagesmith API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    info!(
        "LLM client initialized (outline: {}, detail: {}, image: {})",
        llm_client::OUTLINE_MODEL,
        llm_client::DETAIL_MODEL,
        llm_client::IMAGE_MODEL
    );

    // Build app state
    let state = AppState {
        sessions: SessionStore::new(),
        generator: Arc::new(GeminiContentClient::new(llm)),
        config: config.clone(),
    };

    // Drop sessions whose browser tab went away
    tokio::spawn(sweep_idle_sessions(
        state.sessions.clone(),
        Duration::from_secs(state.config.session_ttl_secs),
    ));
    info!("Idle sessions expire after {}s", state.config.session_ttl_secs);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
