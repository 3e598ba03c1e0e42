//! YouTube caption source.
//!
//! Reads the caption track list from the watch page's player response and
//! downloads the chosen track in YouTube's `json3` timed-text format.

use super::{CaptionError, CaptionFragment, CaptionSource};
use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// Matches various YouTube URL formats and bare video IDs
static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?:
            # Full YouTube URLs
            (?:https?://)?
            (?:www\.|m\.)?
            (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/|youtube\.com/live/)
            ([a-zA-Z0-9_-]{11})
        )
        |
        # Bare video ID (11 characters)
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid regex")
});

static PLAYER_RESPONSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ytInitialPlayerResponse\s*=\s*\{").expect("Invalid regex")
});

/// Extract the 11-character video ID from a YouTube URL or bare ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = VIDEO_ID_REGEX.captures(input.trim())?;

    // Try group 1 (URL format) then group 2 (bare ID)
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// One entry of the player response's caption track list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    language_code: String,
    /// `"asr"` for auto-generated tracks.
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Caption source backed by youtube.com.
pub struct YoutubeCaptionSource {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl YoutubeCaptionSource {
    /// Create a source preferring captions in `language` (e.g. "en").
    pub fn new(language: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: language.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_watch_page(&self, video_id: &str) -> std::result::Result<String, CaptionError> {
        let html = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(html)
    }

    async fn fetch_track(
        &self,
        track: &CaptionTrack,
    ) -> std::result::Result<Vec<CaptionFragment>, CaptionError> {
        let url = json3_url(&track.base_url)?;

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        parse_json3(&body)
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptionSource {
    #[instrument(skip(self))]
    async fn fetch_captions(
        &self,
        reference: &str,
    ) -> std::result::Result<Vec<CaptionFragment>, CaptionError> {
        let video_id = extract_video_id(reference)
            .ok_or_else(|| CaptionError::InvalidReference(reference.to_string()))?;

        let html = self.fetch_watch_page(&video_id).await?;
        let player = parse_player_response(&html).ok_or_else(|| {
            CaptionError::Transport("Could not read the player response from the watch page".into())
        })?;

        check_playability(&player)?;

        let tracks = caption_tracks(&player)?;
        let track = select_track(&tracks, &self.language).ok_or(CaptionError::NoCaptions)?;
        debug!(
            video_id = %video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        self.fetch_track(track).await
    }
}

/// Parse the `ytInitialPlayerResponse` object embedded in a watch page.
fn parse_player_response(html: &str) -> Option<Value> {
    let found = PLAYER_RESPONSE_REGEX.find(html)?;
    // The match ends just past the opening brace
    let json_start = found.end() - 1;

    let mut de = serde_json::Deserializer::from_str(&html[json_start..]);
    Value::deserialize(&mut de).ok()
}

fn check_playability(player: &Value) -> std::result::Result<(), CaptionError> {
    let status = &player["playabilityStatus"];
    match status["status"].as_str() {
        None | Some("OK") => Ok(()),
        Some(other) => {
            let reason = status["reason"].as_str().unwrap_or(other).to_string();
            Err(CaptionError::Unavailable(reason))
        }
    }
}

fn caption_tracks(player: &Value) -> std::result::Result<Vec<CaptionTrack>, CaptionError> {
    let renderer = &player["captions"]["playerCaptionsTracklistRenderer"];
    if renderer.is_null() {
        return Err(CaptionError::Disabled);
    }

    match renderer.get("captionTracks") {
        Some(tracks) => serde_json::from_value(tracks.clone())
            .map_err(|e| CaptionError::Transport(format!("Unexpected caption track list: {}", e))),
        None => Ok(Vec::new()),
    }
}

/// Pick the best track: manual captions in the preferred language, then
/// generated ones, then a regional variant, then whatever comes first.
fn select_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    let exact = |t: &&CaptionTrack| t.language_code.eq_ignore_ascii_case(language);
    let regional = |t: &&CaptionTrack| {
        t.language_code
            .split('-')
            .next()
            .is_some_and(|base| base.eq_ignore_ascii_case(language))
    };

    tracks
        .iter()
        .find(|t| exact(t) && !t.is_generated())
        .or_else(|| tracks.iter().find(exact))
        .or_else(|| tracks.iter().find(regional))
        .or_else(|| tracks.first())
}

/// Rewrite a caption track URL so it returns the `json3` format.
fn json3_url(base_url: &str) -> std::result::Result<url::Url, CaptionError> {
    let mut url = url::Url::parse(base_url)
        .map_err(|e| CaptionError::Transport(format!("Invalid caption track URL: {}", e)))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url)
}

/// Parse a `json3` timed-text document into caption fragments.
fn parse_json3(body: &str) -> std::result::Result<Vec<CaptionFragment>, CaptionError> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| CaptionError::Transport(format!("Failed to parse captions: {}", e)))?;

    let fragments = doc["events"]
        .as_array()
        .map(|events| {
            events
                .iter()
                .filter_map(|event| {
                    let text = event["segs"]
                        .as_array()?
                        .iter()
                        .filter_map(|seg| seg["utf8"].as_str())
                        .collect::<String>()
                        .replace('\n', " ");

                    if text.trim().is_empty() {
                        return None;
                    }

                    Some(CaptionFragment {
                        text: text.trim().to_string(),
                        start_ms: event["tStartMs"].as_u64().unwrap_or(0),
                        duration_ms: event["dDurationMs"].as_u64().unwrap_or(0),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(fragments)
}
