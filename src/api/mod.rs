//! HTTP API for script generation, video search and transcript lookup.
//!
//! Every failure leaves the router as `{"error": "..."}` with a matching
//! status code, including panics inside handlers.

use crate::error::ScriptError;
use crate::orchestrator::{Orchestrator, ScriptRequest};
use crate::transcript::TranscriptResult;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

#[cfg(test)]
mod tests;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build the API router with its middleware stack.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route("/api/generate", post(generate).fallback(method_not_allowed))
        .route("/api/search", post(search).fallback(method_not_allowed))
        .route("/api/transcript", post(transcript).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(state);

    with_layers(routes)
}

fn with_layers(routes: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// === Request Types ===

#[derive(Debug, Deserialize)]
struct GenerateBody {
    topic: Option<String>,
    persona: Option<String>,
    urls: Option<Vec<String>>,
    url1: Option<String>,
    url2: Option<String>,
    url3: Option<String>,
}

impl GenerateBody {
    /// `urls` first, then the legacy single-URL slots.
    fn into_request(self) -> ScriptRequest {
        let references = self
            .urls
            .unwrap_or_default()
            .into_iter()
            .chain([self.url1, self.url2, self.url3].into_iter().flatten())
            .collect();

        ScriptRequest {
            topic: self.topic.unwrap_or_default(),
            persona: self.persona,
            references,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptBody {
    url: Option<String>,
}

/// Decode a JSON body, separating malformed JSON from well-formed JSON of
/// the wrong shape.
///
/// The body must be an object. Field errors are reported from the decoded
/// value, so messages name the offending type but never the target struct.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ScriptError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ScriptError::InvalidJson)?;
    if !value.is_object() {
        return Err(ScriptError::InvalidBody("expected a JSON object".to_string()));
    }

    serde_json::from_value(value).map_err(|e| ScriptError::InvalidBody(e.to_string()))
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn generate(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ScriptError> {
    let request = parse_body::<GenerateBody>(&body)?.into_request();
    let payload = state.orchestrator.generate_script(&request).await?;
    Ok(Json(payload))
}

async fn search(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ScriptError> {
    let SearchBody { query } = parse_body(&body)?;
    let videos = state
        .orchestrator
        .search(query.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(json!({ "videos": videos })))
}

async fn transcript(State(state): State<AppState>, body: Bytes) -> Result<Response, ScriptError> {
    let TranscriptBody { url } = parse_body(&body)?;
    let url = url.unwrap_or_default();
    if url.trim().is_empty() {
        return Err(ScriptError::InvalidInput("URL is required".to_string()));
    }

    let response = match state.orchestrator.fetch_transcript(&url).await {
        TranscriptResult::Success { text } => Json(json!({ "transcript": text })).into_response(),
        TranscriptResult::Failure { reason, kind, .. } => {
            error_response(status_from(kind.status_code()), reason)
        }
    };
    Ok(response)
}

async fn method_not_allowed() -> ScriptError {
    ScriptError::MethodNotAllowed
}

async fn not_found() -> ScriptError {
    ScriptError::NotFound
}

// === Error Mapping ===

impl IntoResponse for ScriptError {
    fn into_response(self) -> Response {
        let status = status_from(self.status_code());

        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        error_response(status, self.public_message())
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(payload.as_ref());
    error!(panic = %message, "Handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "An unknown error occurred".to_string()
    }
}
