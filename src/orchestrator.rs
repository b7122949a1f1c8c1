//! Page-load sequence
//!
//! Runs once per page load: fetch the server config, set up the settings
//! panel, resolve the theme from user preference, server choice or the
//! calendar, then put the theme's class on the overlay container, load its
//! resources and start its native module.

use chrono::{Datelike, Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;

use seasonals_config::{ConfigSource, RemoteConfig, SettingsStore, UserPreference};
use seasonals_effects::{Host, HostEvent, Resource, Selector, Stage, create_module};
use seasonals_theme::{NONE_THEME, determine_theme, get_theme, normalize_theme_name};

use crate::settings_panel::SettingsPanel;

/// Class of the single overlay container
pub const CONTAINER_CLASS: &str = "seasonals-container";

/// How a page load ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user switched the overlay off
    DisabledByUser,
    /// Resolution produced `none`
    NoTheme,
    /// The resolved name is not in the registry
    UnknownTheme(String),
    /// The theme's container class and resources are in place
    Applied(String),
}

/// Pick the theme for this page load
///
/// Priority: the user's forced theme, then the server's fixed choice when
/// automatic selection is explicitly off, then the calendar.
pub fn resolve_theme(preference: &UserPreference, config: Option<&RemoteConfig>, today: impl Datelike) -> String {
    if let Some(forced) = preference.forced_theme() {
        log::info!("Seasonals: User forced theme: {forced}");
        return normalize_theme_name(forced).to_string();
    }

    if let Some(config) = config.filter(|c| !c.automatic_selection()) {
        let selected = config.selected_season.as_deref().unwrap_or(NONE_THEME);
        return normalize_theme_name(selected).to_string();
    }

    determine_theme(today).to_string()
}

/// Give the page exactly one overlay container carrying `container_class`
pub fn update_theme_container(host: &mut dyn Host, container_class: &str) {
    let container = match host.query(Selector::Class(CONTAINER_CLASS)) {
        Some(existing) => existing,
        None => {
            let created = host.create_element("div");
            let body = host.body();
            host.append_child(body, created);
            created
        }
    };
    host.set_class_name(container, &format!("{CONTAINER_CLASS} {container_class}"));
}

/// Everything that stays alive after the page-load sequence
pub struct PageSession {
    pub outcome: Outcome,
    /// `None` when the fetch failed
    pub config: Option<RemoteConfig>,
    pub panel: Option<SettingsPanel>,
    pub stage: Option<Stage>,
}

impl PageSession {
    /// Dispatch a host notification to the panel and the running theme
    pub fn handle(&mut self, host: &mut dyn Host, store: &mut dyn SettingsStore, event: &HostEvent) {
        if let Some(panel) = self.panel.as_mut() {
            panel.handle(host, store, event);
        }
        if let Some(stage) = self.stage.as_mut() {
            stage.handle(host, event);
        }
    }

    /// Drive one display frame
    pub fn frame(&mut self, host: &mut dyn Host, now: f64) {
        if let Some(stage) = self.stage.as_mut() {
            stage.frame(host, now);
        }
    }

    /// Name of the applied theme, if any
    pub fn theme(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Applied(theme) => Some(theme),
            _ => None,
        }
    }
}

/// Runs the page-load sequence
#[derive(Debug, Clone)]
pub struct Orchestrator {
    today: NaiveDate,
    seed: Option<u64>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// Resolve against the local date
    pub fn new() -> Self {
        Self::on_date(Local::now().date_naive())
    }

    /// Resolve against a fixed date
    pub fn on_date(today: NaiveDate) -> Self {
        Self { today, seed: None }
    }

    /// Seed the theme module's random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Fetch the config once, treating any failure as "no config"
    pub async fn fetch_config<S: ConfigSource>(source: &S) -> Option<RemoteConfig> {
        match source.fetch().await {
            Ok(config) => {
                log::debug!("Seasonals: Seasonals Config loaded: {config:?}");
                Some(config)
            }
            Err(e) => {
                log::error!("Seasonals: Error fetching Seasonals config: {e}");
                None
            }
        }
    }

    /// Full sequence: fetch, then [`Orchestrator::start`]
    pub async fn run<S: ConfigSource>(
        &self,
        source: &S,
        host: &mut dyn Host,
        store: &dyn SettingsStore,
    ) -> PageSession {
        let config = Self::fetch_config(source).await;
        self.start(config, host, store)
    }

    /// Everything after the fetch
    pub fn start(&self, config: Option<RemoteConfig>, host: &mut dyn Host, store: &dyn SettingsStore) -> PageSession {
        let panel = if config.as_ref().is_none_or(|c| c.client_side_toggle_enabled()) {
            let mut panel = SettingsPanel::new();
            panel.inject_icon(host);
            log::info!("Seasonals: Client-Side Settings Manager initialized.");
            Some(panel)
        } else {
            None
        };

        let mut session = PageSession {
            outcome: Outcome::NoTheme,
            config,
            panel,
            stage: None,
        };

        let preference = UserPreference::load(store);
        if !preference.enabled {
            log::info!("Seasonals: Disabled by user preference.");
            session.outcome = Outcome::DisabledByUser;
            return session;
        }

        let theme = resolve_theme(&preference, session.config.as_ref(), self.today);
        log::info!("Seasonals: Selected theme: {theme}");
        if theme.is_empty() || theme == NONE_THEME {
            return session;
        }

        let Some(descriptor) = get_theme(&theme) else {
            log::error!("Seasonals: Theme \"{theme}\" not found.");
            session.outcome = Outcome::UnknownTheme(theme);
            return session;
        };

        update_theme_container(host, descriptor.container_class);
        if let Some(css) = descriptor.stylesheet_path {
            load_resource(host, Resource::Stylesheet(css));
        }
        if let Some(js) = descriptor.script_path {
            load_resource(host, Resource::Script(js));
        }
        log::info!("Seasonals: Theme \"{theme}\" applied.");

        let remote = session.config.clone().unwrap_or_default();
        if let Some(module) = create_module(descriptor.name, &remote) {
            let mut stage = match self.seed {
                Some(seed) => Stage::with_rng(module, StdRng::seed_from_u64(seed)),
                None => Stage::new(module),
            };
            if stage.activate(host) {
                session.stage = Some(stage);
            }
        }

        session.outcome = Outcome::Applied(theme);
        session
    }
}

fn load_resource(host: &mut dyn Host, resource: Resource<'_>) {
    if let Err(e) = host.load_resource(resource) {
        log::error!("Seasonals: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seasonals_config::{MemorySettings, THEME_KEY};
    use seasonals_effects::MemoryPage;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_resolve_priority() {
        let auto = UserPreference::default();
        assert_eq!(resolve_theme(&auto, None, date(12, 25)), "santa");

        let forced = UserPreference { enabled: true, theme: "easter".to_string() };
        assert_eq!(resolve_theme(&forced, None, date(12, 25)), "easter");

        let manual = RemoteConfig::from_json(r#"{"AutomateSeasonSelection": false, "SelectedSeason": "ressurection"}"#)
            .unwrap();
        assert_eq!(resolve_theme(&auto, Some(&manual), date(12, 25)), "resurrection");

        let manual_default = RemoteConfig::from_json(r#"{"AutomateSeasonSelection": false}"#).unwrap();
        assert_eq!(resolve_theme(&auto, Some(&manual_default), date(12, 25)), "none");
    }

    #[test]
    fn test_legacy_forced_theme() {
        let store = MemorySettings::new().with(THEME_KEY, "ressurection");
        let preference = UserPreference::load(&store);
        assert_eq!(resolve_theme(&preference, None, date(6, 1)), "resurrection");
    }

    #[test]
    fn test_container_reused() {
        let mut page = MemoryPage::new();
        update_theme_container(&mut page, "autumn-container");
        update_theme_container(&mut page, "easter-container");
        assert_eq!(page.count(CONTAINER_CLASS), 1);
        let container = page.query_all(CONTAINER_CLASS)[0];
        assert_eq!(page.class_name(container), Some("seasonals-container easter-container"));
    }

    #[test]
    fn test_unknown_theme_fails_soft() {
        let mut page = MemoryPage::new();
        let store = MemorySettings::new().with(THEME_KEY, "winter");
        let session = Orchestrator::on_date(date(1, 10)).start(None, &mut page, &store);
        assert_eq!(session.outcome, Outcome::UnknownTheme("winter".to_string()));
        assert_eq!(page.count(CONTAINER_CLASS), 0);
        assert!(page.loaded_resources().is_empty());
    }

    #[test]
    fn test_resource_failure_is_not_fatal() {
        let mut page = MemoryPage::new();
        page.fail_resource("../Seasonals/Resources/autumn.css");
        let store = MemorySettings::new();
        let session = Orchestrator::on_date(date(10, 10)).with_seed(5).start(None, &mut page, &store);
        assert_eq!(session.theme(), Some("autumn"));
        assert_eq!(page.loaded_resources().len(), 2);
        assert!(session.stage.is_some());
        assert!(page.count("leaf") > 0);
    }

    #[test]
    fn test_css_only_theme_has_no_stage() {
        let mut page = MemoryPage::new();
        let store = MemorySettings::new();
        let session = Orchestrator::on_date(date(12, 5)).start(None, &mut page, &store);
        assert_eq!(session.theme(), Some("snowflakes"));
        assert!(session.stage.is_none());
        assert_eq!(
            page.loaded_resources(),
            &["../Seasonals/Resources/snowflakes.css", "../Seasonals/Resources/snowflakes.js"]
        );
    }
}
