//! # Preference Persistence
//!
//! Manages user preferences stored in `~/.config/ponto/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. Two settings persist: the selected theme
//! and the reduced-motion preference. Dashboard data, including the runtime
//! configuration form, is never written here.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/ponto/config.json
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config, data and log directories.
pub const APP_NAME: &str = "ponto";

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The name of the selected theme (must match a built-in theme name).
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Reduced-motion preference. `None` means "not chosen yet".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,
}

fn default_theme_name() -> String {
    "Luminous".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            reduced_motion: None,
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default preferences");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.json"))
    }
}

/// Resolve the platform directories for this application.
pub fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME).context("Could not determine config directory")
}

/// Path of the log file, `<data dir>/ponto.log`.
pub fn log_file_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join(format!("{APP_NAME}.log")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "Luminous");
        assert_eq!(config.reduced_motion, None);
    }

    #[test]
    fn test_deserialize_missing_fields_uses_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unset_reduced_motion_is_not_written() {
        let json = serde_json::to_string(&Config::default()).expect("serialize");
        assert!(!json.contains("reduced_motion"));
    }

    #[test]
    fn test_save_to_load_from_roundtrip() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("subdir").join("config.json");

        let config = Config {
            theme: "Nord".to_string(),
            reduced_motion: Some(true),
        };

        config.save_to(&config_path).expect("save_to");
        let loaded = Config::load_from(&config_path).expect("load_from");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_file_returns_default() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("does_not_exist.json");

        let loaded = Config::load_from(&config_path).expect("load_from");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_from_corrupted_file_is_error() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "not valid json").expect("write");

        let err = Config::load_from(&config_path).expect_err("corrupted file");
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_deny_unknown_fields() {
        let json = r#"{"theme": "Nord", "api_base_url": "https://x"}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err(), "should reject unknown fields");
    }
}
