use serde::Serialize;
use tauri::State;

use crate::models::{CatalogStats, Project, ProjectSummary};
use crate::AppState;

use super::engine;
use super::query::CatalogQuery;
use super::store::POPULAR_TAG_LIMIT;

/// Everything the explore view's filter panel needs up front.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub all_tags: Vec<String>,
    pub all_models: Vec<String>,
    pub popular_tags: Vec<String>,
}

fn summarize(projects: Vec<&Project>) -> Vec<ProjectSummary> {
    projects.into_iter().map(ProjectSummary::from).collect()
}

#[tauri::command]
pub fn list_projects(
    state: State<'_, AppState>,
    query: CatalogQuery,
) -> Result<Vec<ProjectSummary>, String> {
    let filtered = engine::filter_and_sort(state.catalog.projects(), &query);
    Ok(summarize(filtered))
}

#[tauri::command]
pub fn get_project(state: State<'_, AppState>, project_id: String) -> Result<Project, String> {
    state
        .catalog
        .get(&project_id)
        .cloned()
        .ok_or_else(|| format!("no project with id '{project_id}'"))
}

#[tauri::command]
pub fn get_filter_options(state: State<'_, AppState>) -> Result<FilterOptions, String> {
    Ok(FilterOptions {
        all_tags: state.catalog.all_tags(),
        all_models: state.catalog.all_models(),
        popular_tags: state.catalog.popular_tags(POPULAR_TAG_LIMIT),
    })
}

#[tauri::command]
pub fn get_catalog_stats(
    state: State<'_, AppState>,
    query: CatalogQuery,
) -> Result<CatalogStats, String> {
    let filtered = engine::filter_and_sort(state.catalog.projects(), &query);
    Ok(engine::catalog_stats(&filtered))
}

#[tauri::command]
pub fn get_trending(state: State<'_, AppState>) -> Result<Vec<ProjectSummary>, String> {
    Ok(summarize(engine::trending(state.catalog.projects())))
}

#[tauri::command]
pub fn get_recent(state: State<'_, AppState>) -> Result<Vec<ProjectSummary>, String> {
    Ok(summarize(engine::recent(
        state.catalog.projects(),
        chrono::Utc::now(),
    )))
}

#[tauri::command]
pub fn get_most_starred(state: State<'_, AppState>) -> Result<Vec<ProjectSummary>, String> {
    Ok(summarize(engine::most_starred(state.catalog.projects())))
}
