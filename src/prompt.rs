//! Script prompt composition.

use crate::config::Prompts;
use crate::error::{Result, ScriptError};
use serde::Serialize;
use std::collections::HashMap;

/// Fully rendered prompt pair sent to the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptBundle {
    pub system_instruction: String,
    pub user_query: String,
}

/// Renders the system instruction and user query from the script templates.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    prompts: Prompts,
}

impl PromptComposer {
    pub fn new(prompts: Prompts) -> Self {
        Self { prompts }
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Compose the prompt bundle for a topic.
    ///
    /// `trust_intro` is placed verbatim at the template's trust introduction
    /// slot. Blank `source_material` is replaced by the topic-only fallback
    /// sentence.
    pub fn compose(
        &self,
        topic: &str,
        trust_intro: &str,
        source_material: &str,
    ) -> Result<PromptBundle> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ScriptError::InvalidInput("Video Topic is required".to_string()));
        }

        let script = &self.prompts.script;

        let source_material = if source_material.trim().is_empty() {
            script.no_source_material.as_str()
        } else {
            source_material
        };

        let mut vars = HashMap::new();
        vars.insert("topic".to_string(), topic.to_string());
        vars.insert("trust_intro".to_string(), trust_intro.to_string());
        vars.insert("source_material".to_string(), source_material.to_string());

        Ok(PromptBundle {
            system_instruction: self.prompts.render_with_custom(&script.system, &vars),
            user_query: self.prompts.render_with_custom(&script.user, &vars),
        })
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(Prompts::default())
    }
}
