// Calendar Timeline Application
// Main entry point

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use calendar_timeline::models::settings::TimelineSettings;
use calendar_timeline::services::settings::{default_database_path, SettingsService};
use calendar_timeline::services::store::SqliteCalendarStore;
use calendar_timeline::timeline::TimelineController;
use calendar_timeline::ui_egui::TimelineApp;
use calendar_timeline::utils::date::DisplayZone;

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting Calendar Timeline");

    let settings = match SettingsService::from_environment() {
        Some(service) => {
            log::info!("Loading settings from {}", service.path().display());
            service.load_or_init()
        }
        None => TimelineSettings::default(),
    };

    let zone = DisplayZone::from_setting(settings.time_zone.as_deref()).unwrap_or_else(|e| {
        log::warn!("{:#}, falling back to the system time zone", e);
        DisplayZone::Local
    });

    let store = open_store(&settings)?;
    let controller = TimelineController::new(store, zone);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Calendar")
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([320.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Calendar Timeline",
        options,
        Box::new(move |cc| Ok(Box::new(TimelineApp::new(cc, controller, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the timeline window: {}", e))
}

fn open_store(settings: &TimelineSettings) -> Result<SqliteCalendarStore> {
    let path: PathBuf = settings
        .database_path
        .clone()
        .unwrap_or_else(default_database_path);
    let path_str = path.to_string_lossy();

    if settings.read_only {
        log::info!("Opening calendar database read-only: {}", path.display());
        return SqliteCalendarStore::open_read_only(&path_str);
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    log::info!("Opening calendar database: {}", path.display());
    let mut store = SqliteCalendarStore::open(&path_str)?;

    if settings.seed_default_calendars {
        let created = store.seed_default_calendars()?;
        if created > 0 {
            log::info!("Created {} default calendars", created);
        }
    }

    Ok(store)
}
