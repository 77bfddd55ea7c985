// Settings module
// User-editable configuration, persisted as TOML

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// SQLite file holding calendars and events. `None` uses the platform data dir.
    pub database_path: Option<PathBuf>,
    /// IANA zone name used for day boundaries. `None` follows the system zone.
    pub time_zone: Option<String>,
    /// Open the database read-only; the timeline then refuses edits.
    pub read_only: bool,
    /// How long the pointer must rest on an event before editing begins.
    pub long_press_millis: u64,
    /// Height of one hour row in points.
    pub hour_height: f32,
    /// Minimum interval between checks for writes from other processes.
    pub change_poll_millis: u64,
    /// `None` follows the system theme.
    pub dark_mode: Option<bool>,
    /// Create the default calendars on first launch.
    pub seed_default_calendars: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            time_zone: None,
            read_only: false,
            long_press_millis: 500,
            hour_height: 48.0,
            change_poll_millis: 1000,
            dark_mode: None,
            seed_default_calendars: true,
        }
    }
}

impl TimelineSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.long_press_millis == 0 {
            return Err("Long press duration must be greater than 0 ms".to_string());
        }

        if !(12.0..=240.0).contains(&self.hour_height) {
            return Err("Hour height must be between 12 and 240 points".to_string());
        }

        if let Some(zone) = &self.time_zone {
            if zone.trim().is_empty() {
                return Err("Time zone cannot be empty when set".to_string());
            }
        }

        Ok(())
    }
}
