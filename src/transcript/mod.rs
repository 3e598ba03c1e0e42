//! Transcript acquisition for source videos.
//!
//! A [`CaptionSource`] talks to the outside world and returns raw caption
//! fragments. [`TranscriptFetcher`] turns one reference into a
//! [`TranscriptResult`] and never fails past its boundary, and
//! [`TranscriptAggregator`] fans out over many references and folds the
//! outcomes into a single source material block.

mod aggregator;
mod fetcher;
mod youtube;

pub use aggregator::{TranscriptAggregator, SOURCE_DELIMITER};
pub use fetcher::TranscriptFetcher;
pub use youtube::{extract_video_id, YoutubeCaptionSource};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One timed caption line as delivered by the caption source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFragment {
    pub text: String,
    /// Offset from the start of the video, in milliseconds.
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl CaptionFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_ms: 0,
            duration_ms: 0,
        }
    }
}

/// Failure reported by a caption source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionError {
    #[error("Subtitles are disabled for this video")]
    Disabled,

    #[error("No captions available for this video")]
    NoCaptions,

    #[error("Video unavailable: {0}")]
    Unavailable(String),

    #[error("Video not found (404)")]
    NotFound,

    #[error("Invalid YouTube video ID or URL: {0}")]
    InvalidReference(String),

    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for CaptionError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) if status.as_u16() == 404 => CaptionError::NotFound,
            _ => CaptionError::Transport(e.to_string()),
        }
    }
}

/// External capability that retrieves caption fragments for a video.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the ordered caption fragments for a video URL or ID.
    async fn fetch_captions(
        &self,
        reference: &str,
    ) -> std::result::Result<Vec<CaptionFragment>, CaptionError>;
}

/// Classification of a failed transcript fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingReference,
    InvalidReference,
    Disabled,
    NoTranscript,
    Unavailable,
    NotFound,
    TimedOut,
    Transport,
    Other,
}

impl FailureKind {
    /// HTTP status used when a single transcript fetch is served directly.
    pub fn status_code(&self) -> u16 {
        match self {
            FailureKind::MissingReference | FailureKind::InvalidReference => 400,
            FailureKind::Disabled
            | FailureKind::NoTranscript
            | FailureKind::Unavailable
            | FailureKind::NotFound => 404,
            FailureKind::TimedOut => 504,
            FailureKind::Transport | FailureKind::Other => 500,
        }
    }
}

/// Outcome of fetching one transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptResult {
    Success {
        text: String,
    },
    Failure {
        reference: String,
        reason: String,
        kind: FailureKind,
    },
}

impl TranscriptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TranscriptResult::Success { .. })
    }
}
