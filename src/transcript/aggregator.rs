//! Concurrent multi-video transcript aggregation.

use super::{TranscriptFetcher, TranscriptResult};
use crate::config::FailurePolicy;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

/// Separator placed between entries of the combined source material.
pub const SOURCE_DELIMITER: &str = "\n\n---\n\n";

/// Default number of transcripts fetched at the same time.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Fetches transcripts for many videos and folds them into one text block.
#[derive(Clone)]
pub struct TranscriptAggregator {
    fetcher: TranscriptFetcher,
    policy: FailurePolicy,
    max_concurrent: usize,
}

impl TranscriptAggregator {
    pub fn new(fetcher: TranscriptFetcher) -> Self {
        Self {
            fetcher,
            policy: FailurePolicy::default(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Set how failed transcripts appear in the combined material.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the maximum number of concurrent fetches.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn fetcher(&self) -> &TranscriptFetcher {
        &self.fetcher
    }

    /// Fetch every non-blank reference and combine the results.
    ///
    /// Returns an empty string when nothing could be loaded.
    #[instrument(skip_all, fields(count = references.len(), policy = %self.policy))]
    pub async fn aggregate<S: AsRef<str>>(&self, references: &[S]) -> String {
        let results = self.fetch_all(references).await;

        let loaded = results.iter().filter(|r| r.is_success()).count();
        info!(
            "Loaded {} of {} transcripts",
            loaded,
            results.len()
        );

        fold_results(&results, self.policy)
    }

    /// Fetch every non-blank reference, returning outcomes in input order.
    ///
    /// All fetches settle before this returns; a failure never cancels the
    /// others.
    pub async fn fetch_all<S: AsRef<str>>(&self, references: &[S]) -> Vec<TranscriptResult> {
        let references: Vec<String> = references
            .iter()
            .map(|r| r.as_ref().trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();

        if references.is_empty() {
            return Vec::new();
        }

        // Each future owns its reference and fetcher so the stream stays Send
        let mut results: Vec<(usize, TranscriptResult)> = stream::iter(references.into_iter().enumerate())
            .map(|(idx, reference)| {
                let fetcher = self.fetcher.clone();
                async move { (idx, fetcher.fetch(&reference).await) }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        // Completion order is arbitrary; restore input order
        results.sort_by_key(|(idx, _)| *idx);

        results.into_iter().map(|(_, result)| result).collect()
    }
}

/// Fold ordered fetch outcomes into the combined source material.
pub(crate) fn fold_results(results: &[TranscriptResult], policy: FailurePolicy) -> String {
    if !results.iter().any(TranscriptResult::is_success) {
        return String::new();
    }

    let mut entries = Vec::with_capacity(results.len());
    for result in results {
        match result {
            TranscriptResult::Success { text } => entries.push(text.clone()),
            TranscriptResult::Failure {
                reference, reason, ..
            } => {
                if policy == FailurePolicy::Annotate {
                    entries.push(format!(
                        "[Transcript unavailable for {}: {}]",
                        reference, reason
                    ));
                }
            }
        }
    }

    entries.join(SOURCE_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{CaptionError, CaptionFragment, CaptionSource, FailureKind};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Serves canned captions per reference after a per-reference delay.
    struct ScriptedSource {
        entries: HashMap<String, (u64, std::result::Result<Vec<CaptionFragment>, CaptionError>)>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                entries: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn ok(mut self, reference: &str, delay_ms: u64, text: &str) -> Self {
            self.entries.insert(
                reference.to_string(),
                (delay_ms, Ok(vec![CaptionFragment::new(text)])),
            );
            self
        }

        fn err(mut self, reference: &str, delay_ms: u64, error: CaptionError) -> Self {
            self.entries
                .insert(reference.to_string(), (delay_ms, Err(error)));
            self
        }
    }

    #[async_trait]
    impl CaptionSource for ScriptedSource {
        async fn fetch_captions(
            &self,
            reference: &str,
        ) -> std::result::Result<Vec<CaptionFragment>, CaptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, result) = self
                .entries
                .get(reference)
                .cloned()
                .unwrap_or((0, Err(CaptionError::NotFound)));
            tokio::time::sleep(Duration::from_millis(delay)).await;
            result
        }
    }

    fn aggregator(source: ScriptedSource) -> TranscriptAggregator {
        TranscriptAggregator::new(TranscriptFetcher::new(Arc::new(source)))
    }

    #[tokio::test]
    async fn test_preserves_input_order_when_completion_is_reversed() {
        let source = ScriptedSource::new()
            .ok("first", 80, "one")
            .ok("second", 40, "two")
            .ok("third", 0, "three");

        let material = aggregator(source)
            .aggregate(&["first", "second", "third"])
            .await;

        assert_eq!(material, "one\n\n---\n\ntwo\n\n---\n\nthree");
    }

    #[tokio::test]
    async fn test_ordering_holds_with_single_slot_concurrency() {
        let source = ScriptedSource::new()
            .ok("a", 10, "alpha")
            .ok("b", 0, "beta");

        let material = aggregator(source)
            .with_max_concurrent(0)
            .aggregate(&["a", "b"])
            .await;

        assert_eq!(material, "alpha\n\n---\n\nbeta");
    }

    /// Tracks how many fetches are in flight at once.
    #[derive(Default)]
    struct GaugedSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl CaptionSource for GaugedSource {
        async fn fetch_captions(
            &self,
            reference: &str,
        ) -> std::result::Result<Vec<CaptionFragment>, CaptionError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![CaptionFragment::new(reference)])
        }
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently_up_to_bound() {
        let source = Arc::new(GaugedSource::default());
        let aggregator = TranscriptAggregator::new(TranscriptFetcher::new(source.clone()))
            .with_max_concurrent(3);

        let refs = ["r1", "r2", "r3", "r4", "r5", "r6"];
        let material = aggregator.aggregate(&refs).await;

        let peak = source.peak.load(Ordering::SeqCst);
        assert!(peak > 1, "fetches ran sequentially");
        assert!(peak <= 3, "peak {} exceeded the bound", peak);
        assert_eq!(material, refs.join(SOURCE_DELIMITER));
    }

    #[tokio::test]
    async fn test_annotates_failures_inline_by_default() {
        let source = ScriptedSource::new()
            .ok("validURL", 20, "useful words")
            .err("urlThatFails", 0, CaptionError::Disabled);

        let material = aggregator(source)
            .aggregate(&["validURL", "urlThatFails"])
            .await;

        assert_eq!(
            material,
            "useful words\n\n---\n\n[Transcript unavailable for urlThatFails: Transcripts are disabled for this video.]"
        );
    }

    #[tokio::test]
    async fn test_omit_policy_drops_failures() {
        let source = ScriptedSource::new()
            .err("bad", 0, CaptionError::NoCaptions)
            .ok("good", 0, "kept");

        let material = aggregator(source)
            .with_policy(FailurePolicy::Omit)
            .aggregate(&["bad", "good"])
            .await;

        assert_eq!(material, "kept");
    }

    #[tokio::test]
    async fn test_all_failed_yields_empty_material() {
        let source = ScriptedSource::new()
            .err("x", 0, CaptionError::Disabled)
            .err("y", 0, CaptionError::Unavailable("private".into()));

        let material = aggregator(source).aggregate(&["x", "y"]).await;
        assert_eq!(material, "");
    }

    #[tokio::test]
    async fn test_blank_entries_are_skipped_without_fetching() {
        let source = Arc::new(ScriptedSource::new().ok("only", 0, "text"));
        let aggregator = TranscriptAggregator::new(TranscriptFetcher::new(source.clone()));

        let refs = vec!["".to_string(), "  ".to_string(), "only".to_string(), String::new()];
        let results = aggregator.fetch_all(&refs).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].is_success());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_material() {
        let aggregator = aggregator(ScriptedSource::new());
        let empty: [&str; 0] = [];
        assert_eq!(aggregator.aggregate(&empty).await, "");
    }

    #[test]
    fn test_fold_results_keeps_failure_positions() {
        let results = vec![
            TranscriptResult::Failure {
                reference: "r1".into(),
                reason: "Video not found.".into(),
                kind: FailureKind::NotFound,
            },
            TranscriptResult::Success { text: "body".into() },
        ];

        assert_eq!(
            fold_results(&results, FailurePolicy::Annotate),
            "[Transcript unavailable for r1: Video not found.]\n\n---\n\nbody"
        );
        assert_eq!(fold_results(&results, FailurePolicy::Omit), "body");
    }
}
