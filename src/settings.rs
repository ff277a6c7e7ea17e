use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::transitions::TransitionVariant;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettings {
    pub sound_enabled: bool,
    pub transition: TransitionVariant,
    pub random_transitions: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            transition: TransitionVariant::Slide,
            random_transitions: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoredSettings {
    playback: PlaybackSettings,
}

/// JSON-file settings, read once at construction and rewritten on every
/// update. A missing or unreadable file falls back to defaults.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<StoredSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            StoredSettings::default()
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
        {
            let mut guard = self.data.write().unwrap();
            guard.playback = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &StoredSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
