//! Built-in theme descriptors
//!
//! Every theme the front end knows about is listed here. A descriptor only
//! names resources; the decorations themselves live in `seasonals-effects`.

/// Sentinel theme name meaning "no overlay"
pub const NONE_THEME: &str = "none";

/// Stored preference value meaning "let the server / calendar decide"
pub const AUTO_THEME: &str = "auto";

/// Legacy spelling of `resurrection` still found in saved preferences
const LEGACY_RESURRECTION: &str = "ressurection";

/// Static resource bundle for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeDescriptor {
    /// Unique key, also used as the stored preference value
    pub name: &'static str,
    /// Class placed on the overlay container next to `seasonals-container`
    pub container_class: &'static str,
    /// Stylesheet path relative to the page
    pub stylesheet_path: Option<&'static str>,
    /// Script path relative to the page
    pub script_path: Option<&'static str>,
}

impl ThemeDescriptor {
    /// Whether this descriptor is the `none` sentinel
    pub fn is_none(&self) -> bool {
        self.name == NONE_THEME
    }
}

macro_rules! theme {
    ($name:literal, $class:literal) => {
        ThemeDescriptor {
            name: $name,
            container_class: $class,
            stylesheet_path: Some(concat!("../Seasonals/Resources/", $name, ".css")),
            script_path: Some(concat!("../Seasonals/Resources/", $name, ".js")),
        }
    };
}

pub const SNOWFLAKES: ThemeDescriptor = theme!("snowflakes", "snowflakes");
pub const SNOWFALL: ThemeDescriptor = theme!("snowfall", "snowfall-container");
pub const SNOWSTORM: ThemeDescriptor = theme!("snowstorm", "snowstorm-container");
pub const FIREWORKS: ThemeDescriptor = theme!("fireworks", "fireworks");
pub const HALLOWEEN: ThemeDescriptor = theme!("halloween", "halloween-container");
pub const HEARTS: ThemeDescriptor = theme!("hearts", "hearts-container");
pub const CHRISTMAS: ThemeDescriptor = theme!("christmas", "christmas-container");
pub const SANTA: ThemeDescriptor = theme!("santa", "santa-container");
pub const AUTUMN: ThemeDescriptor = theme!("autumn", "autumn-container");
pub const EASTER: ThemeDescriptor = theme!("easter", "easter-container");
pub const RESURRECTION: ThemeDescriptor = theme!("resurrection", "resurrection-container");
pub const SUMMER: ThemeDescriptor = theme!("summer", "summer-container");
pub const SPRING: ThemeDescriptor = theme!("spring", "spring-container");

/// The "no overlay" sentinel: no resources at all
pub const NONE: ThemeDescriptor = ThemeDescriptor {
    name: NONE_THEME,
    container_class: "none",
    stylesheet_path: None,
    script_path: None,
};

/// All known themes, in display order
pub const ALL_THEMES: &[&ThemeDescriptor] = &[
    &SNOWFLAKES,
    &SNOWFALL,
    &SNOWSTORM,
    &FIREWORKS,
    &HALLOWEEN,
    &HEARTS,
    &CHRISTMAS,
    &SANTA,
    &AUTUMN,
    &EASTER,
    &RESURRECTION,
    &SUMMER,
    &SPRING,
    &NONE,
];

/// Get a theme descriptor by name
pub fn get_theme(name: &str) -> Option<&'static ThemeDescriptor> {
    ALL_THEMES.iter().find(|t| t.name == name).copied()
}

/// List all theme names, `none` included
pub fn theme_names() -> Vec<&'static str> {
    ALL_THEMES.iter().map(|t| t.name).collect()
}

/// Themes a user may force from the settings popup (everything but `none`)
pub fn selectable_themes() -> impl Iterator<Item = &'static ThemeDescriptor> {
    ALL_THEMES.iter().copied().filter(|t| !t.is_none())
}

/// Map legacy spellings onto their current theme name
pub fn normalize_theme_name(name: &str) -> &str {
    if name == LEGACY_RESURRECTION {
        RESURRECTION.name
    } else {
        name
    }
}

/// Human-readable label: first letter upper-cased
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
