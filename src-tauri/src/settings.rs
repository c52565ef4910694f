use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::player::DEFAULT_AUTO_ADVANCE_MS;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettings {
    /// Autoplay advance interval in milliseconds. Read each time
    /// playback starts, so a change applies on the next toggle; a
    /// session that is already playing keeps its interval until paused.
    pub auto_advance_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            auto_advance_ms: DEFAULT_AUTO_ADVANCE_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    playback: PlaybackSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn playback(&self) -> PlaybackSettings {
        self.data.read().unwrap().playback.clone()
    }

    pub fn update_playback(&self, settings: PlaybackSettings) -> Result<()> {
        if settings.auto_advance_ms == 0 {
            anyhow::bail!("auto-advance interval must be greater than zero");
        }

        let mut guard = self.data.write().unwrap();
        guard.playback = settings;
        self.persist(&guard)?;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
