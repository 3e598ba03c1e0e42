//! YouTube video search pass-through.

use crate::config::SearchSettings;
use crate::error::{Result, ScriptError};
use crate::generation::upstream_message;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Simplified search hit returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub url: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Default)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

impl SearchItem {
    /// Channels and playlists carry no video id and are skipped.
    fn into_summary(self) -> Option<VideoSummary> {
        let video_id = self.id.video_id.filter(|id| !id.is_empty())?;
        Some(VideoSummary {
            url: format!("https://www.youtube.com/watch?v={}", video_id),
            video_id,
            title: self.snippet.title,
            channel: self.snippet.channel_title,
            thumbnail: self
                .snippet
                .thumbnails
                .default
                .map(|t| t.url)
                .unwrap_or_default(),
        })
    }
}

/// Client for the YouTube Data API search endpoint.
pub struct VideoSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    max_results: u32,
}

impl VideoSearchClient {
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key().map(|k| k.to_string()),
            max_results: settings.max_results,
        })
    }

    /// Search for videos matching a keyword query.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<VideoSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScriptError::InvalidInput("Search query is required".to_string()));
        }

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ScriptError::Config("YouTube API key is not configured".to_string())
        })?;

        let max_results = self.max_results.to_string();
        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(|e| ScriptError::Http(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = upstream_message(&text).unwrap_or(text);
            warn!(status = status.as_u16(), "YouTube search returned an error");

            return Err(ScriptError::Upstream {
                status: status.as_u16(),
                message: format!("YouTube API Error: {}", message),
            });
        }

        let response: SearchResponse = resp
            .json()
            .await
            .map_err(|e| ScriptError::Http(e.without_url()))?;

        let videos: Vec<VideoSummary> = response
            .items
            .into_iter()
            .filter_map(SearchItem::into_summary)
            .collect();

        info!("Found {} videos", videos.len());
        Ok(videos)
    }
}
