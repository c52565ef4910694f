use tauri::State;

use crate::player::{PlayerController, PlayerSnapshot};
use crate::AppState;

fn controller_from_state(state: &State<'_, AppState>) -> PlayerController {
    state.player.clone()
}

#[tauri::command]
pub async fn get_player_state(state: State<'_, AppState>) -> Result<PlayerSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.get_snapshot().await)
}

#[tauri::command]
pub async fn open_replay(
    state: State<'_, AppState>,
    project_id: String,
) -> Result<PlayerSnapshot, String> {
    let project = state
        .catalog
        .get(&project_id)
        .cloned()
        .ok_or_else(|| format!("no project with id '{project_id}'"))?;

    let auto_advance_ms = state.settings.playback().auto_advance_ms;
    let controller = controller_from_state(&state);
    controller
        .open(&project, auto_advance_ms)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn close_replay(state: State<'_, AppState>) -> Result<(), String> {
    let controller = controller_from_state(&state);
    controller.close().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn next_step(state: State<'_, AppState>) -> Result<PlayerSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.next().await)
}

#[tauri::command]
pub async fn previous_step(state: State<'_, AppState>) -> Result<PlayerSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.previous().await)
}

#[tauri::command]
pub async fn jump_to_step(
    state: State<'_, AppState>,
    index: usize,
) -> Result<PlayerSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.jump(index).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn toggle_playback(state: State<'_, AppState>) -> Result<PlayerSnapshot, String> {
    // Read the interval fresh on every toggle so a settings change
    // takes effect the next time playback starts.
    let auto_advance_ms = state.settings.playback().auto_advance_ms;
    let controller = controller_from_state(&state);
    controller
        .toggle_play(auto_advance_ms)
        .await
        .map_err(|e| e.to_string())
}
