//! Seasonals Theme - registry and calendar rules
//!
//! This crate provides:
//! - The static theme registry (name → container class + resources)
//! - Legacy name normalization
//! - The date-based automatic theme choice

pub mod registry;
pub mod season;

pub use registry::{
    ALL_THEMES, AUTO_THEME, NONE_THEME, ThemeDescriptor, display_name, get_theme, normalize_theme_name,
    selectable_themes, theme_names,
};
pub use season::{determine_theme, determine_theme_for_date};
