//! Application configuration for the CLI host
//!
//! Stored as JSON under the platform config dir. Missing fields fall back to
//! defaults so older files keep loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::config::{APP_DIR, DEFAULT_DEBOUNCE_MS, FILENAME, STORE_FILENAME};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Override for the profile store location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    #[serde(default = "default_preview_debounce_ms")]
    pub preview_debounce_ms: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_preview_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            store_path: None,
            preview_debounce_ms: default_preview_debounce_ms(),
        }
    }
}

fn app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

impl AppConfig {
    pub fn path() -> PathBuf {
        app_dir().join(FILENAME)
    }

    /// Profile store location, honouring the configured override
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| app_dir().join(STORE_FILENAME))
    }

    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, creating default config at {:?}", config_path);
            let config = AppConfig::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;

        let config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", config_path))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;

        fs::write(config_path, json)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        info!("Saved config to {:?}", config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.json");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.preview_debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(config.store_path, None);
    }

    #[test]
    fn test_store_path_override() {
        let config = AppConfig {
            store_path: Some(PathBuf::from("/tmp/custom.xml")),
            ..AppConfig::default()
        };
        assert_eq!(config.store_path(), PathBuf::from("/tmp/custom.xml"));
    }
}
