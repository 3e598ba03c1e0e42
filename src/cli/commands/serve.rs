//! HTTP API server.
//!
//! Serves the script generation, search and transcript endpoints.

use crate::api::{self, AppState};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use tracing::info;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    if settings.generation.api_key().is_none() {
        Output::warning("No Gemini API key configured; /api/generate will return 500.");
    }
    if settings.search.api_key().is_none() {
        Output::warning("No YouTube API key configured; /api/search will return 500.");
    }

    let orchestrator = Orchestrator::new(settings)?;
    let app = api::router(AppState::new(orchestrator));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Server listening");

    Output::header("Scriptwright API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Generate", "POST /api/generate");
    Output::kv("Search", "POST /api/search");
    Output::kv("Transcript", "POST /api/transcript");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}
