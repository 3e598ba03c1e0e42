//! Pre-flight checks before outbound calls.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail after fetching transcripts.

use crate::config::Settings;
use crate::error::{Result, ScriptError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Generation requires a Gemini API key.
    Generate,
    /// Search requires a YouTube Data API key.
    Search,
    /// Fetching a transcript needs no credentials.
    Transcript,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Generate => {
            if settings.generation.api_key().is_none() {
                return Err(ScriptError::Config(
                    "Gemini API key not configured. Set GEMINI_API_KEY or generation.api_key in the config file."
                        .to_string(),
                ));
            }
        }
        Operation::Search => {
            if settings.search.api_key().is_none() {
                return Err(ScriptError::Config(
                    "YouTube API key not configured. Set YOUTUBE_API_KEY or search.api_key in the config file."
                        .to_string(),
                ));
            }
        }
        Operation::Transcript => {
            // No external requirements for transcripts
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_transcript_no_requirements() {
        assert!(check(Operation::Transcript, &Settings::default()).is_ok());
    }

    #[test]
    fn test_keys_required() {
        let settings = Settings::default();
        assert!(check(Operation::Generate, &settings).is_err());
        assert!(check(Operation::Search, &settings).is_err());

        let settings = settings.with_api_keys(Some("g".into()), Some("y".into()));
        assert!(check(Operation::Generate, &settings).is_ok());
        assert!(check(Operation::Search, &settings).is_ok());
    }
}
