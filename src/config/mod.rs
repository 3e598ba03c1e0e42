//! Configuration module for Scriptwright.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{PersonaPrompts, Prompts, ScriptPrompts};
pub use settings::{
    FailurePolicy, GeneralSettings, GenerationSettings, PromptSettings, SearchSettings,
    ServerSettings, Settings, TranscriptSettings,
};
