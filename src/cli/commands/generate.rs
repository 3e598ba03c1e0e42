//! Generate command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::generation::extract_text;
use crate::orchestrator::{Orchestrator, ScriptRequest};
use anyhow::Result;

/// Options for the generate command.
pub struct GenerateOptions {
    pub topic: String,
    pub persona: Option<String>,
    pub urls: Vec<String>,
    pub json: bool,
    pub dry_run: bool,
    pub output: Option<String>,
}

/// Run the generate command.
pub async fn run_generate(options: GenerateOptions, settings: Settings) -> Result<()> {
    if !options.dry_run {
        preflight::check(Operation::Generate, &settings)?;
    }

    let orchestrator = Orchestrator::new(settings)?;
    let request = ScriptRequest {
        topic: options.topic,
        persona: options.persona,
        references: options.urls,
    };

    let rendered = if options.dry_run {
        let spinner = Output::spinner("Fetching transcripts...");
        let bundle = orchestrator.prepare(&request).await;
        spinner.finish_and_clear();
        let bundle = bundle?;

        if options.json {
            serde_json::to_string_pretty(&bundle)?
        } else {
            format!(
                "=== System Instruction ===\n{}\n\n=== User Query ===\n{}",
                bundle.system_instruction, bundle.user_query
            )
        }
    } else {
        let spinner = Output::spinner("Fetching transcripts and generating outline...");
        let payload = orchestrator.generate_script(&request).await;
        spinner.finish_and_clear();
        let payload = payload?;

        if options.json {
            serde_json::to_string_pretty(&payload)?
        } else {
            extract_text(&payload)
                .ok_or_else(|| anyhow::anyhow!("Generation response contained no text"))?
        }
    };

    match options.output {
        Some(path) => {
            let path = Settings::expand_path(&path);
            std::fs::write(&path, rendered)?;
            Output::success(&format!("Saved to {}", path.display()));
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
