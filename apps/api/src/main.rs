mod config;
mod cv;
mod email;
mod errors;
mod jobs;
mod llm_client;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::scraper::JobScraper;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Outreach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        config.groq_api_url.clone(),
        config.groq_model.clone(),
        config.llm_temperature,
    )?;
    info!(
        "LLM client initialized (model: {}, temperature: {})",
        llm.model(),
        config.llm_temperature
    );

    // Initialize job page scraper
    let scraper = JobScraper::http()?;

    if config.email_address.is_none() {
        info!("EMAIL_ADDRESS not set; emails will use the contact address from the CV");
    }
    info!("CV uploads limited to {} MB", config.max_file_size_mb);

    // Build app state
    let state = AppState::new(llm, scraper, config.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS once the client origin is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
