//! `seasonals` command-line tool
//!
//! Resolves the active theme, previews a theme on a headless page, edits
//! the per-user settings and patches the web client's `index.html`.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use vello::kurbo::Size;

use seasonals::config::{
    AppConfig, ENABLED_KEY, FileSettings, HttpConfigSource, MemorySettings, RemoteConfig, SettingsStore, THEME_KEY,
    UserPreference,
};
use seasonals::effects::{HostEvent, MemoryPage};
use seasonals::theme::{AUTO_THEME, get_theme, normalize_theme_name};
use seasonals::{NoTransformationService, Orchestrator, ScriptInjector, resolve_theme};

/// Display frame interval used by `preview`
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Seasonal decoration overlays for media-server web front ends
#[derive(Parser, Debug)]
#[command(name = "seasonals", version, about)]
struct Args {
    /// Config file path override
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the theme that would be shown
    Which {
        /// Resolve for this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Skip the server config fetch
        #[arg(long)]
        offline: bool,
    },

    /// Run a theme on a headless page and print what it produced
    Preview {
        /// Force a theme instead of resolving one
        #[arg(long)]
        theme: Option<String>,

        #[arg(long)]
        width: Option<f64>,

        #[arg(long)]
        height: Option<f64>,

        /// Number of display frames to simulate
        #[arg(long)]
        frames: Option<u32>,

        /// Skip the server config fetch
        #[arg(long)]
        offline: bool,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Read or change the per-user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Add the bootstrap script to the web client
    Inject {
        /// Web client directory (defaults to `[web] path`)
        #[arg(long)]
        web_dir: Option<PathBuf>,
    },

    /// Remove the bootstrap script from the web client
    Remove {
        /// Web client directory (defaults to `[web] path`)
        #[arg(long)]
        web_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Get { key: SettingKey },
    Set { key: SettingKey, value: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SettingKey {
    Enabled,
    Theme,
}

impl SettingKey {
    fn store_key(self) -> &'static str {
        match self {
            SettingKey::Enabled => ENABLED_KEY,
            SettingKey::Theme => THEME_KEY,
        }
    }
}

async fn fetch_remote(config: &AppConfig, offline: bool) -> Result<Option<RemoteConfig>> {
    if offline {
        return Ok(None);
    }
    let source = HttpConfigSource::new(&config.server.base_url).context("Failed to create HTTP client")?;
    log::debug!("Fetching config from {}", source.url());
    Ok(Orchestrator::fetch_config(&source).await)
}

fn open_settings() -> Result<FileSettings> {
    FileSettings::open_default().context("Failed to open settings file")
}

async fn which(config: &AppConfig, date: Option<NaiveDate>, offline: bool) -> Result<()> {
    let remote = fetch_remote(config, offline).await?;
    let settings = open_settings()?;
    let preference = UserPreference::load(&settings);
    if !preference.enabled {
        println!("disabled");
        return Ok(());
    }

    let orchestrator = match date {
        Some(date) => Orchestrator::on_date(date),
        None => Orchestrator::new(),
    };
    println!("{}", resolve_theme(&preference, remote.as_ref(), orchestrator.today()));
    Ok(())
}

struct PreviewOptions {
    theme: Option<String>,
    viewport: Size,
    frames: u32,
    offline: bool,
    seed: Option<u64>,
}

async fn preview(config: &AppConfig, options: PreviewOptions) -> Result<()> {
    let remote = fetch_remote(config, options.offline).await?;

    let mut store = MemorySettings::new();
    if let Some(theme) = &options.theme {
        store.set(THEME_KEY, theme)?;
    }

    let mut orchestrator = Orchestrator::new();
    if let Some(seed) = options.seed {
        orchestrator = orchestrator.with_seed(seed);
    }

    let mut page = MemoryPage::with_viewport(options.viewport);
    let mut session = orchestrator.start(remote, &mut page, &store);
    session.handle(&mut page, &mut store, &HostEvent::Mutation);
    for frame in 0..options.frames {
        session.frame(&mut page, f64::from(frame) * FRAME_MS);
    }

    println!("outcome:    {:?}", session.outcome);
    println!("resources:  {}", page.loaded_resources().join(", "));
    match &session.stage {
        Some(stage) => {
            let snapshot = stage.snapshot();
            println!("visibility: {:?}", stage.visibility());
            println!("decorations: {}", snapshot.decorations);
            println!("particles:  {}", snapshot.particles);
            println!("characters: {}", snapshot.characters);
            println!("transients: {}", snapshot.transients);
            println!("loops:      {}", stage.scheduler().active_loops());
        }
        None => println!("no native module"),
    }
    Ok(())
}

fn settings(action: SettingsAction) -> Result<()> {
    let mut store = open_settings()?;
    match action {
        SettingsAction::Get { key } => {
            let preference = UserPreference::load(&store);
            match key {
                SettingKey::Enabled => println!("{}", preference.enabled),
                SettingKey::Theme => println!("{}", preference.theme),
            }
        }
        SettingsAction::Set { key, value } => {
            let value = match key {
                SettingKey::Enabled => {
                    if value != "true" && value != "false" {
                        bail!("enabled must be true or false, got {value:?}");
                    }
                    value
                }
                SettingKey::Theme => {
                    let theme = normalize_theme_name(&value);
                    if theme != AUTO_THEME && get_theme(theme).is_none() {
                        bail!("unknown theme {value:?}");
                    }
                    theme.to_string()
                }
            };
            store
                .set(key.store_key(), &value)
                .with_context(|| format!("Failed to save {}", store.path().display()))?;
            println!("{} = {value}", key.store_key());
        }
    }
    Ok(())
}

fn injector(config: &AppConfig, web_dir: Option<PathBuf>) -> ScriptInjector {
    ScriptInjector::new(web_dir.or_else(|| config.web.path.clone()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AppConfig::load_from(path).with_context(|| format!("Failed to load {}", path.display()))?,
        None => AppConfig::load(),
    };

    match args.command {
        Command::Which { date, offline } => which(&config, date, offline).await?,
        Command::Preview {
            theme,
            width,
            height,
            frames,
            offline,
            seed,
        } => {
            let options = PreviewOptions {
                theme,
                viewport: Size::new(
                    width.unwrap_or(config.preview.width),
                    height.unwrap_or(config.preview.height),
                ),
                frames: frames.unwrap_or(config.preview.frames),
                offline,
                seed,
            };
            preview(&config, options).await?;
        }
        Command::Settings { action } => settings(action)?,
        Command::Inject { web_dir } => {
            let outcome = injector(&config, web_dir).inject(&mut NoTransformationService);
            println!("{outcome:?}");
            if outcome.is_failed() {
                bail!("could not inject the Seasonals script");
            }
        }
        Command::Remove { web_dir } => {
            let outcome = injector(&config, web_dir).remove(&mut NoTransformationService);
            println!("{outcome:?}");
            if outcome.is_failed() {
                bail!("could not remove the Seasonals script");
            }
        }
    }
    Ok(())
}
