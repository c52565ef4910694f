mod catalog;
mod error;
mod models;
mod player;
mod settings;
mod submit;

use catalog::commands::{
    get_catalog_stats, get_filter_options, get_most_starred, get_project, get_recent,
    get_trending, list_projects,
};
use catalog::Catalog;
use log::info;
use player::commands::{
    close_replay, get_player_state, jump_to_step, next_step, open_replay, previous_step,
    toggle_playback,
};
use player::PlayerController;
use settings::{PlaybackSettings, SettingsStore};
use submit::commands::submit_project;
use tauri::{Emitter, Manager, State};

pub(crate) struct AppState {
    pub(crate) catalog: Catalog,
    pub(crate) player: PlayerController,
    pub(crate) settings: SettingsStore,
}

#[tauri::command]
fn get_playback_settings(state: State<AppState>) -> Result<PlaybackSettings, String> {
    Ok(state.settings.playback())
}

#[tauri::command]
fn set_playback_settings(
    settings: PlaybackSettings,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    state
        .settings
        .update_playback(settings.clone())
        .map_err(|e| e.to_string())?;

    app_handle
        .emit("playback-settings-updated", &settings)
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Replaydeck starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let catalog = Catalog::load_embedded()?;
                info!("Loaded catalog with {} projects", catalog.len());

                let player = PlayerController::new(app.handle().clone());

                let settings_path = app_data_dir.join("settings.json");
                let settings = SettingsStore::new(settings_path)?;

                app.manage(AppState {
                    catalog,
                    player,
                    settings,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            list_projects,
            get_project,
            get_filter_options,
            get_catalog_stats,
            get_trending,
            get_recent,
            get_most_starred,
            get_player_state,
            open_replay,
            close_replay,
            next_step,
            previous_step,
            jump_to_step,
            toggle_playback,
            submit_project,
            get_playback_settings,
            set_playback_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
