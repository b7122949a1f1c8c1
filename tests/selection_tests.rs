//! Theme selection tests
//!
//! Calendar table, user overrides, server overrides and the settings
//! round-trip through a real settings file.

mod common;

use common::{PageHarness, TestEnvironment, date};
use seasonals::config::{FileSettings, MemorySettings, RemoteConfig, SettingsStore, StaticConfigSource, THEME_KEY};
use seasonals::theme::{determine_theme_for_date, theme_names};
use seasonals::{Orchestrator, Outcome};

// === Calendar ===

#[test]
fn test_calendar_table() {
    let table = [
        ((1, 1), "fireworks"),
        ((1, 3), "fireworks"),
        ((1, 4), "snowfall"),
        ((2, 9), "snowfall"),
        ((2, 10), "hearts"),
        ((2, 16), "hearts"),
        ((2, 17), "snowfall"),
        ((3, 24), "none"),
        ((3, 25), "easter"),
        ((4, 1), "easter"),
        ((4, 25), "easter"),
        ((4, 26), "none"),
        ((7, 1), "fireworks"),
        ((7, 5), "fireworks"),
        ((7, 6), "none"),
        ((9, 1), "autumn"),
        ((10, 2), "autumn"),
        ((10, 24), "halloween"),
        ((10, 28), "halloween"),
        ((11, 1), "halloween"),
        ((11, 2), "autumn"),
        ((11, 30), "autumn"),
        ((12, 1), "snowflakes"),
        ((12, 21), "snowflakes"),
        ((12, 22), "santa"),
        ((12, 25), "santa"),
        ((12, 27), "santa"),
        ((12, 28), "snowflakes"),
        ((12, 29), "fireworks"),
        ((12, 31), "fireworks"),
    ];

    for ((month, day), expected) in table {
        let session = PageHarness::new().load(date(month, day), None).outcome.clone();
        let resolved = match session {
            Outcome::Applied(theme) => theme,
            Outcome::NoTheme => "none".to_string(),
            other => panic!("unexpected outcome {other:?} on {month}/{day}"),
        };
        assert_eq!(resolved, expected, "{month}/{day}");
    }
}

#[test]
fn test_every_day_resolves_to_a_registered_theme() {
    let names = theme_names();
    for month in 0..12 {
        for day in 1..=31 {
            let theme = determine_theme_for_date(month, day);
            assert!(names.contains(&theme), "{theme} on {month}/{day}");
        }
    }
}

// === Overrides ===

#[test]
fn test_server_choice_beats_calendar() {
    let config = RemoteConfig::from_json(r#"{"AutomateSeasonSelection": false, "SelectedSeason": "hearts"}"#).unwrap();
    let mut harness = PageHarness::new();
    assert_eq!(harness.load(date(12, 25), Some(config)).theme(), Some("hearts"));
}

#[test]
fn test_server_choice_ignored_when_automatic() {
    let config = RemoteConfig::from_json(r#"{"SelectedSeason": "hearts"}"#).unwrap();
    let mut harness = PageHarness::new();
    assert_eq!(harness.load(date(12, 25), Some(config)).theme(), Some("santa"));
}

#[test]
fn test_user_choice_beats_server_choice() {
    let config = RemoteConfig::from_json(r#"{"AutomateSeasonSelection": false, "SelectedSeason": "hearts"}"#).unwrap();
    let mut harness = PageHarness::new().with_setting(THEME_KEY, "fireworks");
    assert_eq!(harness.load(date(12, 25), Some(config)).theme(), Some("fireworks"));
}

#[test]
fn test_disabled_by_user_touches_nothing_but_the_icon() {
    let mut harness = PageHarness::new().with_setting("seasonals-enabled", "false");
    let outcome = harness.load(date(12, 25), None).outcome.clone();
    assert_eq!(outcome, Outcome::DisabledByUser);
    assert_eq!(harness.page.count(seasonals::CONTAINER_CLASS), 0);
    assert_eq!(harness.page.count("seasonal-settings-button"), 1);
}

// === Round-trip ===

#[test]
fn test_easter_round_trip_through_settings_file() {
    let env = TestEnvironment::new();
    {
        let mut settings = FileSettings::open(env.settings_path()).unwrap();
        settings.set(THEME_KEY, "easter").unwrap();
    }

    let settings = FileSettings::open(env.settings_path()).unwrap();
    for (month, day) in [(1, 1), (6, 15), (10, 31), (12, 25)] {
        let mut page = seasonals::effects::MemoryPage::new();
        let session = Orchestrator::on_date(date(month, day)).with_seed(1).start(None, &mut page, &settings);
        assert_eq!(session.theme(), Some("easter"), "{month}/{day}");
    }
}

#[test]
fn test_run_with_static_source() {
    let source = StaticConfigSource::new(r#"{"EnableClientSideToggle": false, "Santa": {"SnowflakesCount": 40}}"#);
    let store = MemorySettings::new();
    let mut page = seasonals::effects::MemoryPage::new();

    let session = pollster::block_on(Orchestrator::on_date(date(12, 24)).with_seed(3).run(&source, &mut page, &store));
    assert_eq!(session.theme(), Some("santa"));
    assert!(session.panel.is_none());
    assert_eq!(session.config.as_ref().map(|c| c.santa.snowflakes_count), Some(40));
    let snapshot = session.stage.as_ref().map(|s| s.snapshot()).unwrap_or_default();
    assert_eq!(snapshot.particles, 40);
}

#[test]
fn test_unreachable_config_falls_back_to_defaults() {
    let store = MemorySettings::new();
    let mut page = seasonals::effects::MemoryPage::new();

    let session = pollster::block_on(Orchestrator::on_date(date(10, 10)).with_seed(3).run(
        &StaticConfigSource::unavailable(),
        &mut page,
        &store,
    ));
    assert!(session.config.is_none());
    assert!(session.panel.is_some());
    assert_eq!(session.theme(), Some("autumn"));
}
