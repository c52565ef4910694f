//! Replay step data models.
//!
//! A replay is one discrete generation step in a project's history:
//! the prompt given to the model, the model that answered, the MCP
//! tools it used, and the files it produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replay {
    pub id: String,
    /// Recorded for display only; array order is the authoritative
    /// step order, not this timestamp.
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub model: String,
    /// MCP tool names used during this step. Opaque strings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mcp: Vec<String>,
    pub files: Vec<FileChange>,
}

/// One file's full content at a replay step. Not a diff: a later step
/// may redeclare the same path with entirely new content and no merge
/// semantics apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub path: String,
    /// Syntax-highlighting hint for the viewer.
    pub language: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<FileDiff>,
}

/// Cosmetic added/removed line counts shown next to a file. Supplied by
/// the dataset, never derived from `content` or checked against it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub added: u32,
    pub removed: u32,
}
