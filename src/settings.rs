//! Game settings and preferences
//!
//! Persisted separately from the progress record.

use serde::{Deserialize, Serialize};

use crate::platform::{Storage, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Silence every sound cue
    pub muted: bool,

    // === Visual Effects ===
    /// Camera shake on dashes and shield hits
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "neonRunnerSettings";
    /// Older builds stored only the mute flag, as "true"/"false"
    const LEGACY_MUTE_KEY: &'static str = "neonRunnerMuted";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    pub fn load(storage: &dyn Storage) -> Self {
        if let Some(json) = storage.get(Self::STORAGE_KEY) {
            match serde_json::from_str::<serde_json::Value>(&json) {
                Ok(value) if value.is_object() => match serde_json::from_value(value) {
                    Ok(settings) => {
                        log::info!("Loaded settings");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
                },
                Ok(_) => log::warn!("Ignoring settings that are not a JSON object"),
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        let muted = storage.get(Self::LEGACY_MUTE_KEY).as_deref() == Some("true");
        if muted {
            log::info!("Migrated legacy mute flag");
        }
        Self {
            muted,
            ..Self::default()
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        storage.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
