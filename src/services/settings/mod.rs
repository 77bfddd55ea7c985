//! Loading and saving [`TimelineSettings`](crate::models::settings::TimelineSettings).

mod service;

pub use service::{default_database_path, SettingsService, CONFIG_ENV_VAR};
