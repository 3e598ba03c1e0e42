//! Speaker personas and their trust introductions.

use crate::config::{PersonaPrompts, Prompts};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named preset controlling the trust introduction copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    /// No fixed copy; the model writes the introduction itself.
    #[default]
    Default,
    MichaelKorona,
    MikeVerticulate,
}

impl Persona {
    /// Resolve a persona identifier. Unknown or empty values fall back to
    /// [`Persona::Default`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "michael-korona" => Persona::MichaelKorona,
            "mike-verticulate" => Persona::MikeVerticulate,
            _ => Persona::Default,
        }
    }

    /// Resolve an optional persona identifier.
    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or_default()
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Persona::Default => write!(f, "default"),
            Persona::MichaelKorona => write!(f, "michael-korona"),
            Persona::MikeVerticulate => write!(f, "mike-verticulate"),
        }
    }
}

/// Build the trust introduction block for a persona with the topic filled in.
pub fn build_trust_intro(persona: Persona, topic: &str, templates: &PersonaPrompts) -> String {
    let template = match persona {
        Persona::Default => &templates.default,
        Persona::MichaelKorona => &templates.michael_korona,
        Persona::MikeVerticulate => &templates.mike_verticulate,
    };

    let mut vars = HashMap::new();
    vars.insert("topic".to_string(), topic.trim().to_string());

    Prompts::render(template, &vars)
}
