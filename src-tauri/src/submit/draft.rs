//! Typed submission drafts.
//!
//! The submission form builds these up field by field; every permitted
//! field is enumerated here instead of being dispatched by name. Drafts
//! are transient: nothing is persisted, the simulated submit discards
//! them after issuing a receipt.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default model preselected on a fresh replay step in the form.
pub const DEFAULT_DRAFT_MODEL: &str = "Claude 3.5 Sonnet";

/// Models offered by the submission form.
pub const AVAILABLE_MODELS: &[&str] = &[
    "Claude 3.5 Sonnet",
    "Claude 3 Opus",
    "GPT-4",
    "GPT-4 Turbo",
    "GPT-3.5 Turbo",
];

/// MCP tools offered by the submission form.
pub const AVAILABLE_MCP_TOOLS: &[&str] =
    &["filesystem", "github", "websocket", "browser", "terminal"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub demo_url: Option<String>,
    pub tags: Vec<String>,
    pub cursor_rules: Option<String>,
    pub replays: Vec<ReplayDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayDraft {
    pub prompt: String,
    pub model: String,
    pub mcp: Vec<String>,
    pub files: Vec<FileDraft>,
}

impl Default for ReplayDraft {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            model: DEFAULT_DRAFT_MODEL.to_string(),
            mcp: Vec::new(),
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileDraft {
    pub path: String,
    pub language: String,
    pub content: String,
}

/// Partial edit of one replay step: only the fields present are
/// applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayDraftPatch {
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub mcp: Option<Vec<String>>,
    pub files: Option<Vec<FileDraft>>,
}

impl ReplayDraft {
    pub fn apply(&mut self, patch: ReplayDraftPatch) {
        if let Some(prompt) = patch.prompt {
            self.prompt = prompt;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(mcp) = patch.mcp {
            self.mcp = mcp;
        }
        if let Some(files) = patch.files {
            self.files = files;
        }
    }
}

impl ProjectDraft {
    /// Add `tag` unless it is blank or already present.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// The submit affordance stays disabled unless this passes: a title,
    /// a description, and at least one step with an actual prompt.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidArgument("title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "description is required".to_string(),
            ));
        }
        if !self.replays.iter().any(|r| !r.prompt.trim().is_empty()) {
            return Err(Error::InvalidArgument(
                "at least one replay step needs a prompt".to_string(),
            ));
        }
        Ok(())
    }
}
