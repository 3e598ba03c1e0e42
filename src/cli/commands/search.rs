//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: Option<u32>, mut settings: Settings) -> Result<()> {
    preflight::check(Operation::Search, &settings)?;

    if let Some(limit) = limit {
        settings.search.max_results = limit;
    }
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Searching YouTube...");
    let results = orchestrator.search(query).await;
    spinner.finish_and_clear();

    match results {
        Ok(videos) => {
            if videos.is_empty() {
                Output::warning("No videos found matching your query.");
            } else {
                Output::success(&format!("Found {} videos", videos.len()));
                for video in &videos {
                    Output::video(video);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
