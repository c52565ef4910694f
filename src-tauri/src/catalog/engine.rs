//! Catalog filter/sort engine.
//!
//! Pure functions over a borrowed project slice: filtering and ranking
//! never mutate or copy the underlying catalog, they return references
//! in a freshly derived order. Sorting is stable so that repeated calls
//! with the same query produce identical orderings, with catalog order
//! breaking ties.

use chrono::{DateTime, Duration, Utc};

use crate::models::{CatalogStats, Project};

use super::query::{CatalogQuery, SortKey};

/// Window used by the "recent" ranking on the trending view.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Apply `query` to the catalog: filter first, then stable-sort the
/// survivors. An empty result is a normal outcome, not an error.
pub fn filter_and_sort<'a>(projects: &'a [Project], query: &CatalogQuery) -> Vec<&'a Project> {
    let mut matched: Vec<&Project> = projects
        .iter()
        .filter(|project| matches_query(project, query))
        .collect();

    sort_projects(&mut matched, query.sort);
    matched
}

/// Conjunction of the three independent predicates. Each is vacuously
/// true when its query field is empty/unset.
fn matches_query(project: &Project, query: &CatalogQuery) -> bool {
    matches_search(project, &query.search)
        && query.tags.iter().all(|tag| project.tags.contains(tag))
        && query
            .model
            .as_deref()
            .map_or(true, |model| project.uses_model(model))
}

fn matches_search(project: &Project, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    let needle = search.to_lowercase();
    project.title.to_lowercase().contains(&needle)
        || project.description.to_lowercase().contains(&needle)
        || project
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

fn sort_projects(projects: &mut [&Project], sort: SortKey) {
    match sort {
        SortKey::Latest => {
            projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        SortKey::Popular => {
            projects.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
        }
        SortKey::Stars => {
            projects.sort_by(|a, b| b.stars.cmp(&a.stars));
        }
        SortKey::Views => {
            projects.sort_by(|a, b| b.views.cmp(&a.views));
        }
    }
}

/// Aggregates for whatever subset the caller is currently showing.
/// Always computed from the filtered result, never the full catalog.
pub fn catalog_stats(projects: &[&Project]) -> CatalogStats {
    CatalogStats {
        project_count: projects.len(),
        total_stars: projects.iter().map(|p| p.stars).sum(),
        total_views: projects.iter().map(|p| p.views).sum(),
        total_replay_steps: projects.iter().map(|p| p.replays.len()).sum(),
    }
}

/// All projects ranked by combined popularity (stars + views), descending.
pub fn trending(projects: &[Project]) -> Vec<&Project> {
    let mut ranked: Vec<&Project> = projects.iter().collect();
    ranked.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
    ranked
}

/// Projects created within the last [`RECENT_WINDOW_DAYS`] of `now`,
/// newest first.
pub fn recent(projects: &[Project], now: DateTime<Utc>) -> Vec<&Project> {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let mut ranked: Vec<&Project> = projects
        .iter()
        .filter(|project| project.created_at > cutoff)
        .collect();
    ranked.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ranked
}

/// All projects ranked by star count, descending.
pub fn most_starred(projects: &[Project]) -> Vec<&Project> {
    let mut ranked: Vec<&Project> = projects.iter().collect();
    ranked.sort_by(|a, b| b.stars.cmp(&a.stars));
    ranked
}
