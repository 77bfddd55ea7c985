use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::TimelineSettings;

/// Overrides the config file location when set.
pub const CONFIG_ENV_VAR: &str = "CALENDAR_TIMELINE_CONFIG";

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "calendar.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "CalendarTimeline", "CalendarTimeline")
}

/// Platform data dir database, or the working directory when none is known.
pub fn default_database_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(DATABASE_FILE),
        None => PathBuf::from(DATABASE_FILE),
    }
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Config file from `CALENDAR_TIMELINE_CONFIG`, else the platform config dir.
    pub fn from_environment() -> Option<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(Self::new(path));
        }
        project_dirs().map(|dirs| Self::new(dirs.config_dir().join(CONFIG_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings; a missing file yields defaults.
    pub fn load(&self) -> Result<TimelineSettings> {
        if !self.path.exists() {
            log::debug!("No config at {}, using defaults", self.path.display());
            return Ok(TimelineSettings::default());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let settings: TimelineSettings = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        Ok(settings)
    }

    pub fn load_or_default(&self) -> TimelineSettings {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings: {:#}, using defaults", e);
                TimelineSettings::default()
            }
        }
    }

    /// Like [`load_or_default`](Self::load_or_default), but a missing file is
    /// first written out with the defaults so it can be edited.
    pub fn load_or_init(&self) -> TimelineSettings {
        if self.path.exists() {
            return self.load_or_default();
        }

        let settings = TimelineSettings::default();
        match self.save(&settings) {
            Ok(()) => log::info!("Wrote default settings to {}", self.path.display()),
            Err(e) => log::warn!("Failed to write default settings: {:#}", e),
        }
        settings
    }

    pub fn save(&self, settings: &TimelineSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let raw = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        Ok(())
    }
}
