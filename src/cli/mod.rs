//! CLI module for Scriptwright.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Scriptwright - Transcript-grounded YouTube script outlines
///
/// Pulls transcripts from reference videos, builds a persona-aware prompt and
/// asks Gemini for an HTML script outline.
#[derive(Parser, Debug)]
#[command(name = "scriptwright")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Gemini API key (overrides the config file)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub gemini_api_key: Option<String>,

    /// YouTube Data API key (overrides the config file)
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true, global = true)]
    pub youtube_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a script outline for a topic
    Generate {
        /// Video topic
        topic: String,

        /// Persona for the trust introduction (michael-korona, mike-verticulate)
        #[arg(long)]
        persona: Option<String>,

        /// Source video URL or ID (repeatable, order is kept)
        #[arg(short, long = "url")]
        urls: Vec<String>,

        /// Print the raw generation payload as JSON
        #[arg(long)]
        json: bool,

        /// Print the composed prompt without calling the generation API
        #[arg(long)]
        dry_run: bool,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Fetch the transcript of a single video
    Transcript {
        /// YouTube URL or video ID
        reference: String,
    },

    /// Search YouTube for videos
    Search {
        /// Search query
        query: String,

        /// Maximum number of results (defaults to search.max_results)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (API keys masked)
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
