//! The in-memory project catalog.
//!
//! The dataset ships with the binary and is loaded once at startup;
//! nothing mutates it afterwards. A production build would swap the
//! embedded JSON for a fetch from a backing store.

use serde_json::from_str;

use crate::error::{Error, Result};
use crate::models::Project;

/// Number of tags surfaced as quick filters on the explore view.
pub const POPULAR_TAG_LIMIT: usize = 5;

const CATALOG_JSON: &str = include_str!("../../data/projects.json");

/// Owns every project for the lifetime of the process.
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    /// Load and validate the embedded dataset.
    pub fn load_embedded() -> Result<Self> {
        let projects: Vec<Project> = from_str(CATALOG_JSON)
            .map_err(|err| Error::InvalidState(format!("embedded catalog is malformed: {err}")))?;
        Self::new(projects)
    }

    /// Build a catalog from an already-loaded project list, rejecting
    /// datasets the rest of the system cannot hold its invariants over.
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for project in &projects {
            if !seen.insert(project.id.as_str()) {
                return Err(Error::InvalidState(format!(
                    "duplicate project id '{}'",
                    project.id
                )));
            }
            // The player assumes at least one step; reject at load time
            // instead of at open time.
            if project.replays.is_empty() {
                return Err(Error::InvalidState(format!(
                    "project '{}' has no replay steps",
                    project.id
                )));
            }
        }

        Ok(Self { projects })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// Distinct tags in first-seen catalog order.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for project in &self.projects {
            for tag in &project.tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }
        tags
    }

    /// Distinct replay models in first-seen catalog order.
    pub fn all_models(&self) -> Vec<String> {
        let mut models: Vec<String> = Vec::new();
        for project in &self.projects {
            for replay in &project.replays {
                if !models.contains(&replay.model) {
                    models.push(replay.model.clone());
                }
            }
        }
        models
    }

    /// Tags ranked by how many projects carry them, descending, ties in
    /// first-seen order, truncated to `limit`.
    pub fn popular_tags(&self, limit: usize) -> Vec<String> {
        let mut ranked: Vec<(String, usize)> = self
            .all_tags()
            .into_iter()
            .map(|tag| {
                let count = self
                    .projects
                    .iter()
                    .filter(|project| project.tags.contains(&tag))
                    .count();
                (tag, count)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked.into_iter().map(|(tag, _)| tag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::models::Replay;

    fn project(id: &str, tags: &[&str], models: &[&str]) -> Project {
        Project {
            id: id.to_string(),
            title: format!("Project {id}"),
            description: String::new(),
            thumbnail: String::new(),
            demo_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            stars: 0,
            views: 0,
            replays: models
                .iter()
                .enumerate()
                .map(|(i, model)| Replay {
                    id: format!("{id}-r{i}"),
                    timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    prompt: "prompt".to_string(),
                    model: model.to_string(),
                    mcp: Vec::new(),
                    files: Vec::new(),
                })
                .collect(),
            cursor_rules: None,
        }
    }

    #[test]
    fn test_embedded_dataset_loads() {
        let catalog = Catalog::load_embedded().unwrap();
        assert!(catalog.len() >= 4);
        // The dataset backs the documented ranking scenario.
        let stars: Vec<u64> = catalog.projects().iter().map(|p| p.stars).collect();
        assert!(stars.contains(&342) && stars.contains(&256));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            project("a", &[], &["GPT-4"]),
            project("a", &[], &["GPT-4"]),
        ]);
        assert!(matches!(result, Err(crate::error::Error::InvalidState(_))));
    }

    #[test]
    fn test_project_without_steps_rejected() {
        let mut orphan = project("a", &[], &["GPT-4"]);
        orphan.replays.clear();
        let result = Catalog::new(vec![orphan]);
        assert!(matches!(result, Err(crate::error::Error::InvalidState(_))));
    }

    #[test]
    fn test_tag_and_model_indexes() {
        let catalog = Catalog::new(vec![
            project("a", &["React", "TypeScript"], &["GPT-4", "Claude 3 Opus"]),
            project("b", &["TypeScript", "Vite"], &["GPT-4"]),
        ])
        .unwrap();

        assert_eq!(catalog.all_tags(), ["React", "TypeScript", "Vite"]);
        assert_eq!(catalog.all_models(), ["GPT-4", "Claude 3 Opus"]);
    }

    #[test]
    fn test_popular_tags_ranked_by_project_count() {
        let catalog = Catalog::new(vec![
            project("a", &["React", "TypeScript"], &["GPT-4"]),
            project("b", &["TypeScript"], &["GPT-4"]),
            project("c", &["TypeScript", "Vite"], &["GPT-4"]),
        ])
        .unwrap();

        assert_eq!(catalog.popular_tags(2), ["TypeScript", "React"]);
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::new(vec![project("a", &[], &["GPT-4"])]).unwrap();
        assert!(catalog.get("a").is_some());
        assert!(catalog.get("missing").is_none());
    }
}
