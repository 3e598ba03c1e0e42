//! Scriptwright - Transcript-grounded YouTube script outlines
//!
//! Backend for an AI-assisted YouTube script generator.
//!
//! # Overview
//!
//! Scriptwright lets you:
//! - Pull transcripts from reference videos, tolerating per-video failures
//! - Build a persona-aware prompt around a video topic
//! - Ask Gemini for an HTML script outline
//! - Search YouTube for candidate reference videos
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `transcript` - Caption retrieval and aggregation
//! - `persona` - Trust introduction presets
//! - `prompt` - Prompt composition
//! - `generation` - Gemini client
//! - `search` - YouTube Data API search
//! - `orchestrator` - Pipeline coordination
//! - `api` - HTTP router
//!
//! # Example
//!
//! ```rust,no_run
//! use scriptwright::config::Settings;
//! use scriptwright::orchestrator::{Orchestrator, ScriptRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let request = ScriptRequest {
//!         topic: "How to price products".to_string(),
//!         persona: Some("michael-korona".to_string()),
//!         references: vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()],
//!     };
//!     let payload = orchestrator.generate_script(&request).await?;
//!     println!("{}", payload);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod orchestrator;
pub mod persona;
pub mod prompt;
pub mod search;
pub mod transcript;

pub use error::{Result, ScriptError};
