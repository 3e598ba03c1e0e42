//! Transcript command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcript::TranscriptResult;
use anyhow::Result;

/// Fetch one transcript and print it to stdout.
pub async fn run_transcript(reference: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching transcript...");
    let result = orchestrator.fetch_transcript(reference).await;
    spinner.finish_and_clear();

    match result {
        TranscriptResult::Success { text } => {
            println!("{}", text);
            Ok(())
        }
        TranscriptResult::Failure { reason, .. } => {
            Output::error(&reason);
            Err(anyhow::anyhow!("Could not fetch transcript for {}", reference))
        }
    }
}
