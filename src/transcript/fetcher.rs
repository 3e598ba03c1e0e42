//! Single-video transcript fetching with failure classification.

use super::{CaptionError, CaptionFragment, CaptionSource, FailureKind, TranscriptResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default per-video fetch timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches one transcript and reports every problem as a [`TranscriptResult::Failure`].
#[derive(Clone)]
pub struct TranscriptFetcher {
    source: Arc<dyn CaptionSource>,
    timeout: Option<Duration>,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn CaptionSource>) -> Self {
        Self::with_timeout(source, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Bound each fetch by `timeout`. A zero duration disables the limit.
    pub fn with_timeout(source: Arc<dyn CaptionSource>, timeout: Duration) -> Self {
        Self {
            source,
            timeout: (!timeout.is_zero()).then_some(timeout),
        }
    }

    /// Fetch the transcript for a video URL or ID.
    #[instrument(skip(self), fields(reference = %reference))]
    pub async fn fetch(&self, reference: &str) -> TranscriptResult {
        let reference = reference.trim();
        if reference.is_empty() {
            return failure(reference, FailureKind::MissingReference, "missing reference");
        }

        let request = self.source.fetch_captions(reference);
        let captions = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(captions) => captions,
                Err(_) => {
                    warn!("Transcript fetch timed out after {:?}", limit);
                    return failure(
                        reference,
                        FailureKind::TimedOut,
                        &format!("Timed out after {:?} while fetching the transcript.", limit),
                    );
                }
            },
            None => request.await,
        };

        match captions {
            Err(e) => {
                let (kind, reason) = classify(&e);
                warn!(error = %e, ?kind, "Transcript fetch failed");
                failure(reference, kind, &reason)
            }
            Ok(fragments) => {
                let text = join_fragments(&fragments);
                if text.is_empty() {
                    warn!("Caption track is empty");
                    return failure(
                        reference,
                        FailureKind::NoTranscript,
                        "No transcript found for this video.",
                    );
                }
                debug!(fragments = fragments.len(), chars = text.len(), "Transcript fetched");
                TranscriptResult::Success { text }
            }
        }
    }
}

fn failure(reference: &str, kind: FailureKind, reason: &str) -> TranscriptResult {
    TranscriptResult::Failure {
        reference: reference.to_string(),
        reason: reason.to_string(),
        kind,
    }
}

/// Join fragment texts with single spaces, skipping blank fragments.
fn join_fragments(fragments: &[CaptionFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a caption source error to a failure kind and user-facing reason.
pub(crate) fn classify(err: &CaptionError) -> (FailureKind, String) {
    match err {
        CaptionError::Disabled => disabled(),
        CaptionError::NoCaptions => (
            FailureKind::NoTranscript,
            "No transcript found for this video.".to_string(),
        ),
        CaptionError::Unavailable(_) => unavailable(),
        CaptionError::NotFound => not_found(),
        CaptionError::InvalidReference(_) => (FailureKind::InvalidReference, err.to_string()),
        CaptionError::Transport(message) => classify_message(message),
    }
}

fn classify_message(message: &str) -> (FailureKind, String) {
    let lower = message.to_lowercase();
    if lower.contains("disabled") {
        disabled()
    } else if lower.contains("private") {
        unavailable()
    } else if lower.contains("404") {
        not_found()
    } else {
        (FailureKind::Transport, message.to_string())
    }
}

fn disabled() -> (FailureKind, String) {
    (
        FailureKind::Disabled,
        "Transcripts are disabled for this video.".to_string(),
    )
}

fn unavailable() -> (FailureKind, String) {
    (
        FailureKind::Unavailable,
        "This video is private or unavailable.".to_string(),
    )
}

fn not_found() -> (FailureKind, String) {
    (FailureKind::NotFound, "Video not found.".to_string())
}
