//! Configuration settings for Scriptwright.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub transcript: TranscriptSettings,
    pub generation: GenerationSettings,
    pub search: SearchSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
        }
    }
}

/// What to do with transcripts that failed to load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep an inline `[Transcript unavailable ...]` note in the source material.
    #[default]
    Annotate,
    /// Drop failed transcripts silently.
    Omit,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "annotate" => Ok(FailurePolicy::Annotate),
            "omit" | "drop" => Ok(FailurePolicy::Omit),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Annotate => write!(f, "annotate"),
            FailurePolicy::Omit => write!(f, "omit"),
        }
    }
}

/// Transcript retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Preferred caption language code.
    pub language: String,
    /// Per-video fetch timeout in seconds. `0` disables the limit.
    pub timeout_secs: u64,
    /// Maximum concurrent transcript fetches per request.
    pub max_concurrent: usize,
    /// Maximum number of source videos accepted per request.
    pub max_references: usize,
    /// Handling of failed transcripts in the combined source material.
    pub failure_policy: FailurePolicy,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            timeout_secs: 30,
            max_concurrent: 5,
            max_references: 10,
            failure_policy: FailurePolicy::Annotate,
        }
    }
}

/// Language-model generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Base URL of the Gemini REST API.
    pub base_url: String,
    /// Model used for `generateContent`.
    pub model: String,
    /// Gemini API key. Usually supplied via `GEMINI_API_KEY`.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-preview-09-2025".to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl GenerationSettings {
    /// The configured API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

/// YouTube Data API search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the YouTube Data API.
    pub base_url: String,
    /// YouTube Data API key. Usually supplied via `YOUTUBE_API_KEY`.
    pub api_key: Option<String>,
    /// Number of results requested per search.
    pub max_results: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            max_results: 5,
            timeout_secs: 30,
        }
    }
}

impl SearchSettings {
    /// The configured API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ScriptError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override API keys from the command line or environment.
    ///
    /// Only non-blank values replace what the config file provided.
    pub fn with_api_keys(mut self, gemini: Option<String>, youtube: Option<String>) -> Self {
        if let Some(key) = gemini.filter(|k| !k.trim().is_empty()) {
            self.generation.api_key = Some(key);
        }
        if let Some(key) = youtube.filter(|k| !k.trim().is_empty()) {
            self.search.api_key = Some(key);
        }
        self
    }

    /// Copy of the settings with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.generation.api_key().is_some() {
            copy.generation.api_key = Some("********".to_string());
        }
        if copy.search.api_key().is_some() {
            copy.search.api_key = Some("********".to_string());
        }
        copy
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scriptwright")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
