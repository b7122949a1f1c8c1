//! Common test utilities and harness
//!
//! Provides reusable utilities for functional testing including:
//! - Test environment setup (temp web directory, settings file)
//! - A headless page driven through the full page-load sequence

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;
use vello::kurbo::Size;

use seasonals::config::{MemorySettings, RemoteConfig, SettingsStore};
use seasonals::effects::{Host, HostEvent, MemoryPage, ModuleSnapshot};
use seasonals::settings_panel::HEADER_CLASS;
use seasonals::{Orchestrator, PageSession};

/// Seed used for every page load in the harness
pub const SEED: u64 = 2024;

/// Display frame interval
pub const FRAME_MS: f64 = 16.0;

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

/// Test environment with an isolated web directory
pub struct TestEnvironment {
    /// Temporary directory owning everything below
    pub temp_dir: TempDir,
    /// Web client directory holding `index.html`
    pub web_dir: PathBuf,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let web_dir = temp_dir.path().join("web");
        fs::create_dir_all(&web_dir).expect("Failed to create web directory");
        Self { temp_dir, web_dir }
    }

    /// Write the web client's index page
    pub fn write_index(&self, content: &str) {
        fs::write(self.index_path(), content).expect("Failed to write index.html");
    }

    pub fn read_index(&self) -> String {
        fs::read_to_string(self.index_path()).expect("Failed to read index.html")
    }

    pub fn index_path(&self) -> PathBuf {
        self.web_dir.join("index.html")
    }

    /// Path for a settings file that does not exist yet
    pub fn settings_path(&self) -> PathBuf {
        self.temp_dir.path().join("settings.toml")
    }
}

/// A headless page with a header bar, a settings store and a session
pub struct PageHarness {
    pub page: MemoryPage,
    pub store: MemorySettings,
    pub session: Option<PageSession>,
    now: f64,
}

impl PageHarness {
    /// Desktop-sized page
    pub fn new() -> Self {
        Self::with_viewport(1280.0, 720.0)
    }

    pub fn with_viewport(width: f64, height: f64) -> Self {
        let mut page = MemoryPage::with_viewport(Size::new(width, height));
        let body = page.body();
        page.add_element(body, "div", HEADER_CLASS);
        Self {
            page,
            store: MemorySettings::new(),
            session: None,
            now: 0.0,
        }
    }

    /// Preload a settings key
    pub fn with_setting(mut self, key: &str, value: &str) -> Self {
        self.store.set(key, value).expect("memory store accepts writes");
        self
    }

    /// Run the page-load sequence on `on`, then deliver the first mutation
    pub fn load(&mut self, on: NaiveDate, config: Option<RemoteConfig>) -> &PageSession {
        let session = Orchestrator::on_date(on)
            .with_seed(SEED)
            .start(config, &mut self.page, &self.store);
        self.session = Some(session);
        self.notify(HostEvent::Mutation);
        self.session()
    }

    /// Simulate a reload: tear the running theme down and load again
    pub fn reload(&mut self, on: NaiveDate, config: Option<RemoteConfig>) -> &PageSession {
        if let Some(stage) = self.session.as_mut().and_then(|s| s.stage.as_mut()) {
            stage.teardown(&mut self.page);
        }
        self.load(on, config)
    }

    pub fn session(&self) -> &PageSession {
        self.session.as_ref().expect("page loaded")
    }

    /// Deliver a host notification to the session
    pub fn notify(&mut self, event: HostEvent) {
        if let Some(session) = self.session.as_mut() {
            session.handle(&mut self.page, &mut self.store, &event);
        }
    }

    /// Drive `count` display frames
    pub fn run_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.now += FRAME_MS;
            if let Some(session) = self.session.as_mut() {
                session.frame(&mut self.page, self.now);
            }
        }
    }

    pub fn snapshot(&self) -> ModuleSnapshot {
        self.session()
            .stage
            .as_ref()
            .map(|stage| stage.snapshot())
            .unwrap_or_default()
    }

    pub fn active_loops(&self) -> usize {
        self.session()
            .stage
            .as_ref()
            .map_or(0, |stage| stage.scheduler().active_loops())
    }
}
