//! Server-delivered settings
//!
//! The server answers `GET ../Seasonals/Config` with one JSON object: a few
//! top-level switches plus one nested object per theme. Every key is
//! optional. Numeric values of `0` fall back to the documented default, the
//! same way a missing key does. A numeric key holding `null`, a negative or
//! a non-number is read as `0` and defaulted the same way.

use serde::{Deserialize, Deserializer, Serialize};

use crate::ConfigError;

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0))
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0))
}

fn nonzero_u32(value: u32, default: u32) -> u32 {
    if value == 0 { default } else { value }
}

fn positive_f64(value: f64, default: f64) -> f64 {
    if value > 0.0 { value } else { default }
}

/// Autumn leaves settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AutumnConfig {
    pub enable_autumn: bool,
    pub enable_random_leaves: bool,
    pub enable_random_leaves_mobile: bool,
    pub enable_different_duration: bool,
    pub enable_rotation: bool,
    #[serde(deserialize_with = "lenient_u32")]
    pub leaf_count: u32,
}

impl Default for AutumnConfig {
    fn default() -> Self {
        Self {
            enable_autumn: true,
            enable_random_leaves: true,
            enable_random_leaves_mobile: false,
            enable_different_duration: true,
            enable_rotation: false,
            leaf_count: 25,
        }
    }
}

/// Halloween symbols settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HalloweenConfig {
    pub enable_halloween: bool,
    pub enable_random_symbols: bool,
    pub enable_random_symbols_mobile: bool,
    pub enable_different_duration: bool,
    #[serde(deserialize_with = "lenient_u32")]
    pub symbol_count: u32,
}

impl Default for HalloweenConfig {
    fn default() -> Self {
        Self {
            enable_halloween: true,
            enable_random_symbols: true,
            enable_random_symbols_mobile: false,
            enable_different_duration: true,
            symbol_count: 25,
        }
    }
}

/// Easter eggs and bunny settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EasterConfig {
    pub enable_easter: bool,
    pub enable_random_easter: bool,
    pub enable_random_easter_mobile: bool,
    pub enable_different_duration: bool,
    #[serde(deserialize_with = "lenient_u32")]
    pub egg_count: u32,
    pub enable_bunny: bool,
    /// Traversal time in milliseconds
    #[serde(deserialize_with = "lenient_f64")]
    pub bunny_duration: f64,
    /// Hop amplitude in pixels
    #[serde(deserialize_with = "lenient_f64")]
    pub hop_height: f64,
    /// Milliseconds
    #[serde(deserialize_with = "lenient_f64")]
    pub min_bunny_rest_time: f64,
    /// Milliseconds
    #[serde(deserialize_with = "lenient_f64")]
    pub max_bunny_rest_time: f64,
}

impl Default for EasterConfig {
    fn default() -> Self {
        Self {
            enable_easter: true,
            enable_random_easter: true,
            enable_random_easter_mobile: false,
            enable_different_duration: true,
            egg_count: 20,
            enable_bunny: true,
            bunny_duration: 12000.0,
            hop_height: 12.0,
            min_bunny_rest_time: 2000.0,
            max_bunny_rest_time: 5000.0,
        }
    }
}

/// Resurrection symbols settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ResurrectionConfig {
    pub enable_resurrection: bool,
    pub enable_random_symbols: bool,
    pub enable_random_symbols_mobile: bool,
    pub enable_different_duration: bool,
    /// Total symbol count, baseline included
    #[serde(deserialize_with = "lenient_u32")]
    pub symbol_count: u32,
}

impl Default for ResurrectionConfig {
    fn default() -> Self {
        Self {
            enable_resurrection: true,
            enable_random_symbols: true,
            enable_random_symbols_mobile: false,
            enable_different_duration: true,
            symbol_count: 12,
        }
    }
}

/// Santa and snowfall settings
///
/// Santa timings are in seconds, unlike the easter bunny.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SantaConfig {
    pub enable_santa: bool,
    #[serde(deserialize_with = "lenient_u32")]
    pub snowflakes_count: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub snowflakes_count_mobile: u32,
    #[serde(deserialize_with = "lenient_f64")]
    pub snow_fall_speed: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub santa_speed: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub santa_speed_mobile: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub max_santa_rest_time: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub min_santa_rest_time: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub max_present_fall_speed: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub min_present_fall_speed: f64,
}

impl Default for SantaConfig {
    fn default() -> Self {
        Self {
            enable_santa: true,
            snowflakes_count: 500,
            snowflakes_count_mobile: 250,
            snow_fall_speed: 3.0,
            santa_speed: 10.0,
            santa_speed_mobile: 8.0,
            max_santa_rest_time: 8.0,
            min_santa_rest_time: 3.0,
            max_present_fall_speed: 5.0,
            min_present_fall_speed: 2.0,
        }
    }
}

/// The whole `/Seasonals/Config` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RemoteConfig {
    /// `None` means the key was absent (treated as enabled)
    pub enable_client_side_toggle: Option<bool>,
    /// `None` means the key was absent (treated as automatic)
    pub automate_season_selection: Option<bool>,
    /// Theme used when automatic selection is off
    pub selected_season: Option<String>,
    pub autumn: AutumnConfig,
    pub halloween: HalloweenConfig,
    pub easter: EasterConfig,
    pub santa: SantaConfig,
    pub resurrection: ResurrectionConfig,
}

impl RemoteConfig {
    /// Parse a config payload, applying defaults for absent and zero values
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RemoteConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Whether the settings icon may be shown; only an explicit `false` disables it
    pub fn client_side_toggle_enabled(&self) -> bool {
        self.enable_client_side_toggle != Some(false)
    }

    /// Whether the calendar picks the theme; only an explicit `false` disables it
    pub fn automatic_selection(&self) -> bool {
        self.automate_season_selection != Some(false)
    }

    /// Replace zero counts and durations with their defaults
    pub fn normalized(mut self) -> Self {
        let autumn = AutumnConfig::default();
        self.autumn.leaf_count = nonzero_u32(self.autumn.leaf_count, autumn.leaf_count);

        let halloween = HalloweenConfig::default();
        self.halloween.symbol_count = nonzero_u32(self.halloween.symbol_count, halloween.symbol_count);

        let easter = EasterConfig::default();
        self.easter.egg_count = nonzero_u32(self.easter.egg_count, easter.egg_count);
        self.easter.bunny_duration = positive_f64(self.easter.bunny_duration, easter.bunny_duration);
        self.easter.hop_height = positive_f64(self.easter.hop_height, easter.hop_height);
        self.easter.min_bunny_rest_time =
            positive_f64(self.easter.min_bunny_rest_time, easter.min_bunny_rest_time);
        self.easter.max_bunny_rest_time =
            positive_f64(self.easter.max_bunny_rest_time, easter.max_bunny_rest_time);

        let resurrection = ResurrectionConfig::default();
        self.resurrection.symbol_count =
            nonzero_u32(self.resurrection.symbol_count, resurrection.symbol_count);

        let santa = SantaConfig::default();
        let s = &mut self.santa;
        s.snowflakes_count = nonzero_u32(s.snowflakes_count, santa.snowflakes_count);
        s.snowflakes_count_mobile = nonzero_u32(s.snowflakes_count_mobile, santa.snowflakes_count_mobile);
        s.snow_fall_speed = positive_f64(s.snow_fall_speed, santa.snow_fall_speed);
        s.santa_speed = positive_f64(s.santa_speed, santa.santa_speed);
        s.santa_speed_mobile = positive_f64(s.santa_speed_mobile, santa.santa_speed_mobile);
        s.max_santa_rest_time = positive_f64(s.max_santa_rest_time, santa.max_santa_rest_time);
        s.min_santa_rest_time = positive_f64(s.min_santa_rest_time, santa.min_santa_rest_time);
        s.max_present_fall_speed = positive_f64(s.max_present_fall_speed, santa.max_present_fall_speed);
        s.min_present_fall_speed = positive_f64(s.min_present_fall_speed, santa.min_present_fall_speed);

        self
    }
}
