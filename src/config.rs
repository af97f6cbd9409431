// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Read from `$SIGNBOOK_CONFIG` or `<config dir>/signbook/config.yaml`.
//! A missing file yields the defaults; a partial file overrides only the
//! keys it names.

use crate::models::LanguagePair;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "SIGNBOOK_CONFIG";
const APP_DIR: &str = "signbook";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where documents are stored, one JSON file each.
    pub store_dir: PathBuf,
    /// Where uploaded media is copied.
    pub media_dir: PathBuf,
    /// Idle time before an edit is saved automatically.
    pub autosave_delay_ms: u64,
    /// Languages of newly created documents.
    pub default_language: LanguagePair,
    pub default_author: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self {
            store_dir: data_dir.join("documents"),
            media_dir: data_dir.join("media"),
            autosave_delay_ms: 2000,
            default_language: LanguagePair::new("fr", "lsf"),
            default_author: "Anonymous".to_string(),
        }
    }
}

impl AppConfig {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Config file location: the environment override, else the platform
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.autosave_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "autosave_delay_ms: 500\ndefault_language:\n  primary: en\n  secondary: ase\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.autosave_delay_ms, 500);
        assert_eq!(config.default_language, LanguagePair::new("en", "ase"));
        assert_eq!(config.default_author, "Anonymous");
        assert_eq!(config.store_dir, AppConfig::default().store_dir);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "autosave_delay_ms: [not a number]").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
