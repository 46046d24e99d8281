use std::path::{Path, PathBuf};
use std::time::Duration;

use keybox_revocation::DEFAULT_STATUS_URL;
use keybox_scan::{DEFAULT_DESTINATION_DIR, ScanOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_status_url")]
    pub status_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_destination_dir")]
    pub destination_dir: String,
    #[serde(default = "default_move_valid")]
    pub move_valid: bool,
}

fn default_status_url() -> String {
    DEFAULT_STATUS_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_destination_dir() -> String {
    DEFAULT_DESTINATION_DIR.to_string()
}

fn default_move_valid() -> bool {
    true
}

impl Config {
    /// Load from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("keybox-check")
            .join("config.toml")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            move_valid: self.move_valid,
            destination_dir: self.destination_dir.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            status_url: default_status_url(),
            timeout_secs: default_timeout_secs(),
            destination_dir: default_destination_dir(),
            move_valid: default_move_valid(),
        }
    }
}
