//! Prompt templates for Scriptwright.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub script: ScriptPrompts,
    /// Trust introduction copy per persona.
    pub personas: PersonaPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for script outline generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPrompts {
    /// System instruction; `{{trust_intro}}` marks where the persona block goes.
    pub system: String,
    /// User query; receives `{{topic}}` and `{{source_material}}`.
    pub user: String,
    /// Used in place of source material when no transcript could be loaded.
    pub no_source_material: String,
}

impl Default for ScriptPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a professional YouTube scriptwriter. Your task is to generate a detailed YouTube script outline based on the user's topic and provided source material. You MUST format your response in clean, semantic HTML.

- Use <h2> for main sections (Hook, Trust Introduction, Body, etc.).
- Use <h3> for sub-sections (e.g., Section 1, Part 1, Step 2a).
- Use <p> for paragraphs.
- Use <ul> and <li> for bullet points.
- Use <strong> for emphasis on things like 'DO:', 'DON'T:', and 'Visuals:'.
- Use <em> or <i> for italicized notes like *Add b-roll...*.

Your response should follow this exact structure:

<div>
    <h2>Hook - (First 15-30 seconds)</h2>
    <p><strong>Example Hook:</strong> [Generate a compelling 15-30 second hook here based on the Video Topic.]</p>
    <ul>
        <li><strong>DO:</strong> [Specific, compelling action for the hook]</li>
        <li><strong>DON'T:</strong> [Specific common mistake to avoid for this topic]</li>
    </ul>
{{trust_intro}}
    <h2>Body (Main Content)</h2>
    <h3>Section 1: [Title of Section 1 based on topic/transcripts] (~ 60-120 seconds approx)</h3>
    <p>[Brief overview of points in this section. Break down complex info from source material into digestible bullet points.]</p>
    <p><strong>Visuals:</strong> [Minimalistic text or b-roll suggestion]</p>
    <h3>Section 2: [Title of Section 2 based on topic/transcripts] (~ 3-4 minutes approx)</h3>
    <p>[Short intro to the section.]</p>
    <p><strong>Visuals:</strong> [Minimalistic visual, e.g., text card with steps]</p>
    <h3>Section 2a: Step #1 [Title of Step 1] (~ 15-25 seconds approx)</h3>
    <p>[Explanation of this step, based on source material.]</p>
    <p><strong>Visuals:</strong> [Minimalistic visual]</p>
    <p><strong>Notes:</strong> [Any relevant tips]</p>
    <h3>[Continue with more steps as needed...]</h3>
    <h2>Notes (For the Team to Add)</h2>
    <ul>
        <li>Idea #1</li>
        <li>Idea #2</li>
        <li>Idea #3</li>
    </ul>
    <h2>Additional Notes</h2>
    <ul>
        <li><strong>Visual Engagement:</strong> [Simple visual advice]</li>
        <li><strong>Timing:</strong> [Advice on timing]</li>
        <li><strong>Hooks & Retention:</strong> [Advice on internal hooks]</li>
    </ul>
    <h2>Mid CTA</h2>
    <p>[A relevant CTA, e.g., "Enjoying this so far? Hit subscribe for more tips..."]</p>
    <h2>End CTA</h2>
    <p>[A relevant End CTA, e.g., "Add this video to your ending card: [suggest a follow-up video topic]"]</p>
    <p><em>[Action cue, e.g., "Point with fingers..."]</em></p>
</div>

You must use the provided Video Topic and Source Material to fill in all the bracketed [] content. Be thorough and creative. If the Trust Introduction is already written out, keep it word for word."#
                .to_string(),

            user: r#"Video Topic: {{topic}}

Source Material / Transcripts:
{{source_material}}"#
                .to_string(),

            no_source_material:
                "No source material provided. Please generate the outline based on the topic alone."
                    .to_string(),
        }
    }
}

/// Trust introduction blocks, one per persona. `{{topic}}` is substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaPrompts {
    pub default: String,
    pub michael_korona: String,
    pub mike_verticulate: String,
}

impl Default for PersonaPrompts {
    fn default() -> Self {
        Self {
            default: r#"    <h2>Trust Introduction - (15-30 seconds)</h2>
    <p>[Generate a trust intro here. Build authority and state the value proposition for {{topic}}.]</p>
    <p><em>*Add b-roll footage of [relevant b-roll] here.*</em></p>"#
                .to_string(),

            michael_korona: r#"    <h2>Trust Introduction - (15-30 seconds)</h2>
    <p>So hey, I'm Michael… the CMO at KORONA POS. We help thousands of retailers all across the US run smoother, more profitable retail stores — from mom and pop coffee shops to multi-location retail chains. I've been in the retail tech game for years, and in this video, I'm about to show you how to solve the problem of {{topic}}.</p>"#
                .to_string(),

            mike_verticulate: r#"    <h2>Trust Introduction - (15-30 seconds)</h2>
    <p>So hey, I'm Mihkel. I'm the founder at Verticulate. We've helped tens of clients globally - from startups all the way to enterprises - eliminate waste in their processes by implementing better systems and workflow automations with AI, saving thousands of hours in the process... and in this video, I'm going to show you how to solve the problem of {{topic}}.</p>"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }

            let personas_path = custom_path.join("personas.toml");
            if personas_path.exists() {
                let content = std::fs::read_to_string(&personas_path)?;
                prompts.personas = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single left-to-right pass: values are inserted
    /// verbatim and never scanned for further placeholders. Unknown
    /// placeholders are left as written.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find("}}") else {
                result.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let key = &after[..end];
            match vars.get(key.trim()) {
                Some(value) => result.push_str(value),
                None => {
                    result.push_str("{{");
                    result.push_str(key);
                    result.push_str("}}");
                }
            }
            rest = &after[end + 2..];
        }

        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
