//! TOML-based application configuration.
//!
//! Stored at `~/.config/podium/config.toml`. Every field has a default,
//! so an absent file yields a usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tick cadence of the timing loop, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// How many ticks the loop dwells after a grace notification.
    #[serde(default = "default_dwell_ticks")]
    pub dwell_ticks: u32,
    /// Lead-in countdown before the timer starts, in seconds.
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
    /// Override for the speech records file location.
    #[serde(default)]
    pub records_path: Option<PathBuf>,
}

fn default_tick_ms() -> u64 {
    1000
}
fn default_dwell_ticks() -> u32 {
    2
}
fn default_countdown_secs() -> u64 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            dwell_ticks: default_dwell_ticks(),
            countdown_secs: default_countdown_secs(),
            records_path: None,
        }
    }
}

impl Config {
    /// `~/.config/podium/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("podium").join("config.toml"))
    }

    /// Load from the default location; defaults if the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(data) => toml::from_str(&data).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let data = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, data).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Records file path: the override, else `~/.local/share/podium/...`,
    /// else the working directory.
    pub fn records_path(&self) -> PathBuf {
        if let Some(path) = &self.records_path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("podium").join("speech_records.json"))
            .unwrap_or_else(|| PathBuf::from("speech_records.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absent_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.tick_ms, 1000);
        assert_eq!(config.dwell_ticks, 2);
        assert_eq!(config.countdown_secs, 3);
        assert!(config.records_path.is_none());
    }

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            tick_ms: 250,
            records_path: Some(dir.path().join("records.json")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tick_ms, 250);
        assert_eq!(loaded.records_path, Some(dir.path().join("records.json")));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tick_ms = 500\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tick_ms, 500);
        assert_eq!(config.dwell_ticks, 2);
    }
}
