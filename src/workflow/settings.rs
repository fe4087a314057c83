//! API key settings: edit, save and probe the ipstack key.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use super::events::Notice;
use crate::config::{self, Config, ConfigError};
use crate::lookup::{GeolocationLookup, KeyStatus};

pub struct SettingsController {
    config: Mutex<Config>,
    path: Option<PathBuf>,
    lookup: Arc<dyn GeolocationLookup>,
    pending_key: Mutex<String>,
}

impl SettingsController {
    /// `path` is where [`save`](Self::save) writes the config file. Without
    /// one the key can still be checked, but not saved.
    pub fn new(
        config: Config,
        path: Option<PathBuf>,
        lookup: Arc<dyn GeolocationLookup>,
    ) -> Self {
        let controller = Self {
            config: Mutex::new(config),
            path,
            lookup,
            pending_key: Mutex::new(String::new()),
        };
        controller.load();
        controller
    }

    /// Reset the pending key to the configured one.
    pub fn load(&self) -> String {
        let key = self.config.lock().api_key().unwrap_or_default().to_string();
        *self.pending_key.lock() = key.clone();
        key
    }

    pub fn api_key_input(&self) -> String {
        self.pending_key.lock().clone()
    }

    pub fn set_api_key_input(&self, key: impl Into<String>) {
        *self.pending_key.lock() = key.into();
    }

    pub fn can_save(&self) -> bool {
        !self.pending_key.lock().trim().is_empty()
    }

    pub fn can_check(&self) -> bool {
        self.can_save()
    }

    /// The configuration as last saved or loaded.
    pub fn config(&self) -> Config {
        self.config.lock().clone()
    }

    /// Persist the pending key and start using it for lookups.
    pub async fn save(&self) -> Result<Notice, ConfigError> {
        let key = self.pending_key.lock().trim().to_string();
        if key.is_empty() {
            return Ok(Notice::new(Notice::SAVING_TITLE, "The API key can't be empty."));
        }

        let path = self.path.clone().ok_or(ConfigError::NoConfigDir)?;

        let mut updated = self.config();
        updated.credentials.ipstack_api_key = Some(key.clone());
        config::save_async(updated.clone(), path.clone()).await?;

        *self.config.lock() = updated;
        self.lookup.set_api_key(&key);
        tracing::info!("API key saved to {:?}", path);

        Ok(Notice::new(Notice::SAVING_TITLE, "Settings saved successfully."))
    }

    /// Check the pending key against the API.
    ///
    /// The check runs with what the user typed. The client's previous key is
    /// put back afterwards, only [`save`](Self::save) changes it for good.
    pub async fn check_api_key(&self) -> (KeyStatus, Notice) {
        let key = self.pending_key.lock().trim().to_string();
        let active = self.lookup.api_key();

        self.lookup.set_api_key(&key);
        let status = self.lookup.key_status().await;
        self.lookup.set_api_key(&active);
        let message = match &status {
            KeyStatus::Valid => "The API key is valid.",
            KeyStatus::Invalid => "Invalid API key.",
            KeyStatus::Unreachable(reason) => {
                tracing::warn!("API key check failed: {}", reason);
                "Internet connection problem."
            }
        };
        (status, Notice::new(Notice::KEY_CHECK_TITLE, message))
    }
}
