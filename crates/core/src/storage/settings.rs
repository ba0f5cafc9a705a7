use std::sync::Arc;

use crate::models::settings::Settings;

use super::store::KeyValueStore;

/// Storage record key for user settings.
pub const SETTINGS_KEY: &str = "portfolio_settings";

/// Durable store for the settings record.
/// Absence or corruption yields default settings, never an error.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load stored settings, or defaults on any failure.
    #[must_use]
    pub fn load(&self) -> Settings {
        let raw = match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(e) => {
                log::warn!("Failed to read settings record: {e}");
                return Settings::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Corrupt settings record, using defaults: {e}");
                Settings::default()
            }
        }
    }

    /// Persist the settings record.
    pub fn save(&self, settings: &Settings) {
        let raw = match serde_json::to_string(settings) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to serialize settings: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(SETTINGS_KEY, &raw) {
            log::warn!("Failed to write settings record: {e}");
        }
    }
}
