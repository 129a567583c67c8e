//! Prompt templates loaded from a JSON file.
//!
//! The file maps a prompt key (`analysis`, `calendar_sync`, `governance`,
//! `sprint_analytics`) to the template text. It is read once at startup and
//! the resulting [`PromptStore`] is shared read-only.

use std::collections::HashMap;
use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::info;

use crate::errors::{BotError, BotResult};

/// Wraps a template and the user's text into the final prompt.
const COMPOSE_TEMPLATE: &str = "{{{template}}}\n\nЗапрос:\n{{{text}}}\nОтвет:";

#[derive(Serialize)]
struct ComposeContext<'a> {
    template: &'a str,
    text: &'a str,
}

/// Read-only set of prompt templates.
pub struct PromptStore {
    templates: HashMap<String, String>,
    handlebars: Handlebars<'static>,
}

impl PromptStore {
    /// Create a store from an in-memory map.
    pub fn new(templates: HashMap<String, String>) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        Self {
            templates,
            handlebars,
        }
    }

    /// Load templates from a JSON file.
    ///
    /// A missing or malformed file is a startup failure.
    pub fn load(path: impl AsRef<Path>) -> BotResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BotError::PromptConfig {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let store = Self::from_json(&content).map_err(|e| BotError::PromptConfig {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(path = %path.display(), count = store.templates.len(), "Prompts loaded");
        Ok(store)
    }

    /// Parse templates from JSON text.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let templates: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self::new(templates))
    }

    /// Template for `key`, or an empty string when absent.
    pub fn get(&self, key: &str) -> &str {
        self.templates.get(key).map_or("", String::as_str)
    }

    /// Compose the full prompt sent to the model.
    pub fn compose(&self, template: &str, text: &str) -> BotResult<String> {
        self.handlebars
            .render_template(COMPOSE_TEMPLATE, &ComposeContext { template, text })
            .map_err(|e| BotError::Internal {
                reason: format!("Failed to compose prompt: {e}"),
            })
    }

    /// All known prompt keys.
    pub fn keys(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}
