//! Seasonals - seasonal decoration overlays for media-server web front ends
//!
//! The engine is split across the workspace:
//! - `seasonals-theme` - theme registry and calendar rules
//! - `seasonals-config` - server config, user preferences, CLI config
//! - `seasonals-effects` - host abstraction, scheduler and theme modules
//!
//! This crate ties them together into the page-load sequence, the
//! in-page settings panel and the `index.html` script injector.

pub mod injector;
pub mod orchestrator;
pub mod settings_panel;

pub use injector::{
    InjectError, InjectOutcome, MemoryRegistry, NoTransformationService, RemoveOutcome, ScriptInjector,
    Transformation, TransformationRegistry, patch_index_html,
};
pub use orchestrator::{CONTAINER_CLASS, Orchestrator, Outcome, PageSession, resolve_theme, update_theme_container};
pub use settings_panel::SettingsPanel;

pub use seasonals_config as config;
pub use seasonals_effects as effects;
pub use seasonals_theme as theme;
