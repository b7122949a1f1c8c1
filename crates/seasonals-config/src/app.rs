//! Command-line tool configuration
//!
//! Loads `~/.seasonals/config.toml` with sensible defaults. Every section
//! and field may be omitted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

const CONFIG_DIR_NAME: &str = ".seasonals";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Media server connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server root the config endpoint is resolved against
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8096".to_string(),
        }
    }
}

/// Web client installation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Directory holding the web client's `index.html`
    pub path: Option<PathBuf>,
}

/// Headless preview run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: f64,
    pub height: f64,
    /// Display frames to simulate
    pub frames: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            frames: 600,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub web: WebConfig,
    pub preview: PreviewConfig,
}

impl AppConfig {
    /// Get the config directory path (~/.seasonals)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the config file path (~/.seasonals/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE_NAME))
    }

    /// Load config from file, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::info!("Could not determine config path, using defaults");
            return Self::default();
        };

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    /// Load a specific file, reporting read and parse failures
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::Toml(path.to_path_buf(), e))
    }
}
