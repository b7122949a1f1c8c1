//! Per-user key/value preferences
//!
//! Two keys are used: `seasonals-enabled` ("true"/"false") and
//! `seasonals-theme` ("auto" or a theme name). They are written by the
//! settings popup and read once per page load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use seasonals_theme::{AUTO_THEME, normalize_theme_name};

use crate::ConfigError;

/// Storage key for the on/off switch
pub const ENABLED_KEY: &str = "seasonals-enabled";
/// Storage key for the forced theme
pub const THEME_KEY: &str = "seasonals-theme";

/// Default settings directory name (under the home directory)
const SETTINGS_DIR_NAME: &str = ".seasonals";
/// Default settings file name
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Client-local key/value storage
pub trait SettingsStore {
    /// Read a raw value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a raw value
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// Resolved user preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPreference {
    /// Whether any overlay should be shown
    pub enabled: bool,
    /// `auto` or a (normalized) theme name
    pub theme: String,
}

impl Default for UserPreference {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: AUTO_THEME.to_string(),
        }
    }
}

impl UserPreference {
    /// Read both keys, applying defaults and legacy-name normalization
    pub fn load(store: &dyn SettingsStore) -> Self {
        let enabled = store
            .get(ENABLED_KEY)
            .map(|v| v == "true")
            .unwrap_or(true);
        let theme = store
            .get(THEME_KEY)
            .map(|v| normalize_theme_name(&v).to_string())
            .unwrap_or_else(|| AUTO_THEME.to_string());
        Self { enabled, theme }
    }

    /// The forced theme, if the user picked one
    pub fn forced_theme(&self) -> Option<&str> {
        if self.theme == AUTO_THEME {
            None
        } else {
            Some(&self.theme)
        }
    }

    /// Persist both keys
    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<(), ConfigError> {
        store.set(ENABLED_KEY, if self.enabled { "true" } else { "false" })?;
        store.set(THEME_KEY, &self.theme)
    }
}

/// In-memory storage (tests, previews)
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Settings persisted as a flat TOML table
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSettings {
    /// Open the settings file at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read(path.clone(), e))?;
            toml::from_str(&content).map_err(|e| ConfigError::Toml(path.clone(), e))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    /// Open `~/.seasonals/settings.toml`
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(Self::default_path()?)
    }

    /// Get the default settings file path
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| ConfigError::Write(dir.to_path_buf(), e))?;
        }
        let content = toml::to_string_pretty(&self.values)?;
        fs::write(&self.path, content).map_err(|e| ConfigError::Write(self.path.clone(), e))
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()?;
        log::debug!("Stored {} = {} in {:?}", key, value, self.path);
        Ok(())
    }
}
