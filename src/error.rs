//! Error types for Scriptwright.

use thiserror::Error;

/// Library-level error type for Scriptwright operations.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    Config(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

impl ScriptError {
    /// HTTP status code this error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            ScriptError::InvalidInput(_) | ScriptError::InvalidJson | ScriptError::InvalidBody(_) => {
                400
            }
            ScriptError::NotFound => 404,
            ScriptError::MethodNotAllowed => 405,
            ScriptError::Upstream { status, .. } if (400..=599).contains(status) => *status,
            ScriptError::Upstream { .. } => 502,
            ScriptError::Config(_)
            | ScriptError::Io(_)
            | ScriptError::Json(_)
            | ScriptError::TomlParse(_)
            | ScriptError::Http(_)
            | ScriptError::Internal(_) => 500,
        }
    }

    /// Message safe to show to API callers.
    ///
    /// Configuration and client errors carry their own messages; internal
    /// failures are reduced to their category without source details.
    pub fn public_message(&self) -> String {
        match self {
            ScriptError::Io(_) | ScriptError::TomlParse(_) => {
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for Scriptwright operations.
pub type Result<T> = std::result::Result<T, ScriptError>;
