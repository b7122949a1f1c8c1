//! Seasonals Configuration
//!
//! Server-delivered theme settings, the one-shot config fetch, and the
//! per-user preference store, plus the command-line tool's own config file.

pub mod app;
mod error;
pub mod remote;
pub mod settings;
pub mod source;

pub use app::{AppConfig, PreviewConfig, ServerConfig, WebConfig};
pub use error::ConfigError;
pub use remote::{AutumnConfig, EasterConfig, HalloweenConfig, RemoteConfig, ResurrectionConfig, SantaConfig};
pub use settings::{ENABLED_KEY, FileSettings, MemorySettings, SettingsStore, THEME_KEY, UserPreference};
pub use source::{CONFIG_ENDPOINT, ConfigSource, HttpConfigSource, StaticConfigSource};
