// Test fixtures - reusable test data
// A seeded SQLite store and fixed instants on a plain UTC day

#![allow(dead_code)]

use calendar_timeline::models::calendar::{Calendar, NewCalendar};
use calendar_timeline::models::event::{CalendarEvent, NewEvent};
use calendar_timeline::services::store::SqliteCalendarStore;
use calendar_timeline::utils::date::DisplayZone;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use egui::Color32;

pub mod dates {
    use super::*;

    /// Monday 2 June 2025, no DST transition in UTC.
    pub fn june_2() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    /// Instant on `june_2` at `hour:minute` UTC.
    pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
    }

    pub fn utc() -> DisplayZone {
        DisplayZone::Named(chrono_tz::UTC)
    }
}

/// In-memory store holding a red "Home" and a blue "Work" calendar.
pub struct Fixture {
    pub store: SqliteCalendarStore,
    pub red: Calendar,
    pub blue: Calendar,
}

impl Fixture {
    pub fn new() -> Self {
        let mut store = SqliteCalendarStore::in_memory().expect("Failed to open store");
        let red = store
            .create_calendar(NewCalendar::new("Home", Color32::RED))
            .expect("Failed to create calendar");
        let blue = store
            .create_calendar(NewCalendar::new("Work", Color32::BLUE))
            .expect("Failed to create calendar");
        Self { store, red, blue }
    }

    pub fn add(
        &mut self,
        calendar_id: i64,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CalendarEvent {
        let event = NewEvent::new(title, start, end, calendar_id).expect("Invalid event");
        self.store.insert_event(event).expect("Failed to insert event")
    }
}
