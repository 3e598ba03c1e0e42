//! Pipeline orchestrator for Scriptwright.
//!
//! Coordinates one script request from transcript retrieval to generation.

use crate::config::{Prompts, Settings};
use crate::error::{Result, ScriptError};
use crate::generation::GenerationClient;
use crate::persona::{build_trust_intro, Persona};
use crate::prompt::{PromptBundle, PromptComposer};
use crate::search::{VideoSearchClient, VideoSummary};
use crate::transcript::{
    CaptionSource, TranscriptAggregator, TranscriptFetcher, TranscriptResult, YoutubeCaptionSource,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// A request to generate one script outline.
#[derive(Debug, Clone, Default)]
pub struct ScriptRequest {
    pub topic: String,
    pub persona: Option<String>,
    /// Source video URLs or IDs, in order. Blank entries are ignored.
    pub references: Vec<String>,
}

/// The main orchestrator for the Scriptwright pipeline.
pub struct Orchestrator {
    settings: Settings,
    composer: PromptComposer,
    aggregator: TranscriptAggregator,
    generator: GenerationClient,
    searcher: VideoSearchClient,
}

impl Orchestrator {
    /// Create a new orchestrator backed by YouTube captions.
    pub fn new(settings: Settings) -> Result<Self> {
        // Load prompts (with optional custom directory and variables)
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let captions: Arc<dyn CaptionSource> =
            Arc::new(YoutubeCaptionSource::new(&settings.transcript.language)?);

        Self::with_components(settings, prompts, captions)
    }

    /// Create an orchestrator with a custom caption source.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        captions: Arc<dyn CaptionSource>,
    ) -> Result<Self> {
        let fetcher = TranscriptFetcher::with_timeout(
            captions,
            Duration::from_secs(settings.transcript.timeout_secs),
        );
        let aggregator = TranscriptAggregator::new(fetcher)
            .with_policy(settings.transcript.failure_policy)
            .with_max_concurrent(settings.transcript.max_concurrent);

        let generator = GenerationClient::new(&settings.generation)?;
        let searcher = VideoSearchClient::new(&settings.search)?;

        info!(
            "Using {} with {} failure policy",
            generator.model(),
            settings.transcript.failure_policy
        );

        Ok(Self {
            settings,
            composer: PromptComposer::new(prompts),
            aggregator,
            generator,
            searcher,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate a request, load its transcripts and compose the prompt.
    ///
    /// Transcript failures never fail this step; they only shape the source
    /// material.
    #[instrument(skip_all, fields(topic = %request.topic))]
    pub async fn prepare(&self, request: &ScriptRequest) -> Result<PromptBundle> {
        let topic = validate_topic(&request.topic)?;
        self.validate_references(&request.references)?;

        let material = self.aggregator.aggregate(&request.references).await;

        let persona = Persona::from_option(request.persona.as_deref());
        info!(%persona, "Building prompt");
        let trust_intro = build_trust_intro(persona, topic, &self.composer.prompts().personas);

        self.composer.compose(topic, &trust_intro, &material)
    }

    /// Run the full pipeline and return the raw generation payload.
    ///
    /// Input and configuration problems are reported before any outbound
    /// call is made.
    #[instrument(skip_all, fields(topic = %request.topic))]
    pub async fn generate_script(&self, request: &ScriptRequest) -> Result<Value> {
        validate_topic(&request.topic)?;
        self.validate_references(&request.references)?;
        self.generator.ensure_configured()?;

        let bundle = self.prepare(request).await?;
        self.generator.generate(&bundle).await
    }

    /// Fetch a single transcript.
    pub async fn fetch_transcript(&self, reference: &str) -> TranscriptResult {
        self.aggregator.fetcher().fetch(reference).await
    }

    /// Search YouTube for videos.
    pub async fn search(&self, query: &str) -> Result<Vec<VideoSummary>> {
        self.searcher.search(query).await
    }

    fn validate_references(&self, references: &[String]) -> Result<()> {
        let max = self.settings.transcript.max_references;
        let count = references.iter().filter(|r| !r.trim().is_empty()).count();

        if max > 0 && count > max {
            return Err(ScriptError::InvalidInput(format!(
                "Too many video URLs: {} provided, at most {} allowed",
                count, max
            )));
        }
        Ok(())
    }
}

fn validate_topic(topic: &str) -> Result<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ScriptError::InvalidInput("Video Topic is required".to_string()));
    }
    Ok(topic)
}
