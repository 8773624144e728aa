use std::{collections::HashMap, fs, path::Path, time::Duration};

use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE: &str = "supmanager.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub page_size: u32,
    pub min_slots: u32,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5050".into(),
            page_size: 5,
            min_slots: 3,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("page size must be at least 1")]
    ZeroPageSize,
    #[error("invalid api url '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<Url, SettingsError> {
        if self.page_size == 0 {
            return Err(SettingsError::ZeroPageSize);
        }
        Url::parse(&self.api_url).map_err(|err| SettingsError::InvalidApiUrl {
            url: self.api_url.clone(),
            reason: err.to_string(),
        })
    }

    fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
            tracing::warn!(file = SETTINGS_FILE, "ignoring unparsable settings file");
            return;
        };

        if let Some(v) = file_cfg.get("api_url").and_then(toml::Value::as_str) {
            self.api_url = v.to_string();
        }
        if let Some(v) = file_cfg.get("page_size").and_then(toml::Value::as_integer) {
            self.page_size = u32::try_from(v).unwrap_or(0);
        }
        if let Some(v) = file_cfg.get("min_slots").and_then(toml::Value::as_integer) {
            self.min_slots = u32::try_from(v).unwrap_or(self.min_slots);
        }
        if let Some(v) = file_cfg
            .get("request_timeout_secs")
            .and_then(toml::Value::as_integer)
        {
            self.request_timeout_secs = u64::try_from(v).unwrap_or(self.request_timeout_secs);
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("APP__API_URL") {
            self.api_url = v;
        }

        if let Some(v) = lookup("APP__PAGE_SIZE") {
            match v.parse::<u32>() {
                Ok(parsed) => self.page_size = parsed,
                Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__PAGE_SIZE"),
            }
        }
        if let Some(v) = lookup("APP__MIN_SLOTS") {
            if let Ok(parsed) = v.parse::<u32>() {
                self.min_slots = parsed;
            }
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
    }
}

/// Defaults, then `supmanager.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        settings.apply_file(&raw);
    }
    settings.apply_env(lookup);

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
