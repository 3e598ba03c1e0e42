//! Scriptwright CLI entry point.

use anyhow::Result;
use clap::Parser;
use scriptwright::cli::commands::{self, GenerateOptions};
use scriptwright::cli::{Cli, Commands};
use scriptwright::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };
    let settings = settings.with_api_keys(cli.gemini_api_key.clone(), cli.youtube_api_key.clone());

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("scriptwright={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Generate {
            topic,
            persona,
            urls,
            json,
            dry_run,
            output,
        } => {
            let options = GenerateOptions {
                topic,
                persona,
                urls,
                json,
                dry_run,
                output,
            };
            commands::run_generate(options, settings).await?;
        }

        Commands::Transcript { reference } => {
            commands::run_transcript(&reference, settings).await?;
        }

        Commands::Search { query, limit } => {
            commands::run_search(&query, limit, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, cli.config.as_deref(), settings)?;
        }
    }

    Ok(())
}
