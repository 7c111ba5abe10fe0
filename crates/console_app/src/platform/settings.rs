use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use console_core::DEFAULT_PAGE_SIZE;
use console_engine::ClientSettings;
use console_logging::parse_level;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILENAME: &str = "console.ron";
pub const URL_ENV: &str = "REGISTRY_CONSOLE_URL";

/// Connection and panel defaults read from `console.ron`.
///
/// Missing fields take their default, so a file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub poll_interval_ms: u64,
    pub page_size: u32,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_level: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            username: None,
            password: None,
            poll_interval_ms: 10_000,
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    /// `None` when the configured name is not a level.
    pub fn log_level(&self) -> Option<LevelFilter> {
        parse_level(&self.log_level)
    }
}

/// Reads settings. A missing file gives the defaults.
///
/// Runs before the logger exists, so failures are returned rather than logged.
pub fn load(path: &Path) -> anyhow::Result<ConsoleSettings> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ConsoleSettings::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading settings from {}", path.display()))
        }
    };
    ron::from_str(&content).with_context(|| format!("parsing settings from {}", path.display()))
}

pub fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to replace it", path.display());
    }
    save(path, &ConsoleSettings::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn save(path: &Path, settings: &ConsoleSettings) -> anyhow::Result<()> {
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(settings, pretty).context("serializing settings")?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}
