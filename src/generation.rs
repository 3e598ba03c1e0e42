//! Gemini `generateContent` client.

use crate::config::GenerationSettings;
use crate::error::{Result, ScriptError};
use crate::prompt::PromptBundle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the language-model generation endpoint.
pub struct GenerationClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GenerationClient {
    /// Create a client from generation settings.
    pub fn new(settings: &GenerationSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key().map(|k| k.to_string()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fail with a configuration error when no API key is set.
    pub fn ensure_configured(&self) -> Result<()> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(ScriptError::Config("API key not configured".to_string())),
        }
    }

    /// Send the prompt bundle and return the raw response payload.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn generate(&self, bundle: &PromptBundle) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ScriptError::Config("API key not configured".to_string()))?;

        let body = GenerateContentRequest {
            contents: vec![Content::text(&bundle.user_query)],
            system_instruction: Content::text(&bundle.system_instruction),
        };

        info!("Requesting script outline");

        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            // The request URL carries the API key
            .map_err(|e| ScriptError::Http(e.without_url()))
            .inspect_err(|e| warn!(error = %e, "Failed to make http request"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = upstream_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            warn!(status = status.as_u16(), message = %message, "Generation API returned an error");

            return Err(ScriptError::Upstream {
                status: status.as_u16(),
                message: format!("Generation API error: {}", message),
            });
        }

        let payload = resp
            .json::<Value>()
            .await
            .map_err(|e| ScriptError::Http(e.without_url()))?;

        debug!("Generation succeeded");
        Ok(payload)
    }
}

/// Extract `error.message` from a structured error body.
pub(crate) fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.trim().is_empty())
}

/// Concatenate the text parts of the first candidate in a generation payload.
pub fn extract_text(payload: &Value) -> Option<String> {
    let parts = payload["candidates"][0]["content"]["parts"].as_array()?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
