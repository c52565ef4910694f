//! Project catalog data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Replay;

/// One catalog entry: a showcased project together with the ordered
/// sequence of generation steps that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Image URL, display-only, never validated.
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub stars: u64,
    pub views: u64,
    /// Insertion order is the chronological order of generation steps.
    pub replays: Vec<Replay>,
    /// Free-text editor rules block, opaque to the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_rules: Option<String>,
}

impl Project {
    /// Combined popularity used by the `Popular` sort and the trending
    /// ranking: stars and views weigh equally.
    pub fn popularity(&self) -> u64 {
        self.stars + self.views
    }

    /// Whether any step of this project was generated by `model`.
    pub fn uses_model(&self, model: &str) -> bool {
        self.replays.iter().any(|replay| replay.model == model)
    }
}

/// List-view projection of a project: everything a card needs, without
/// shipping the full replay contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub stars: u64,
    pub views: u64,
    pub replay_count: usize,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            thumbnail: project.thumbnail.clone(),
            demo_url: project.demo_url.clone(),
            created_at: project.created_at,
            tags: project.tags.clone(),
            stars: project.stars,
            views: project.views,
            replay_count: project.replays.len(),
        }
    }
}

/// Aggregates over a filtered result set, recomputed per query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub project_count: usize,
    pub total_stars: u64,
    pub total_views: u64,
    pub total_replay_steps: usize,
}
