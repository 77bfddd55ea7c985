use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use egui::Color32;
use rusqlite::{self, params, Row};

use super::{AccessStatus, CalendarStore, StoreChange};
use crate::models::calendar::{parse_hex_color, Calendar, NewCalendar, DEFAULT_CALENDAR_COLOR};
use crate::models::event::{CalendarEvent, NewEvent, SaveSpan};
use crate::services::database::Database;
use crate::utils::date::DayRange;

const DEFAULT_CALENDARS: [(&str, Color32); 2] = [
    ("Personal", Color32::from_rgb(0xFF, 0x3B, 0x30)),
    ("Work", Color32::from_rgb(0x00, 0x7A, 0xFF)),
];

const EVENT_COLUMNS: &str = "e.id, e.title, e.start_datetime, e.end_datetime, e.is_all_day,
                             c.id, c.title, c.color";

/// Calendar store backed by a SQLite database.
pub struct SqliteCalendarStore {
    db: Database,
    subscribers: Vec<Sender<StoreChange>>,
    data_version: i64,
}

impl SqliteCalendarStore {
    /// Open (or create) a database file and make sure the schema exists.
    pub fn open(path: &str) -> Result<Self> {
        let db = Database::new(path)?;
        db.initialize_schema()?;
        Self::from_database(db)
    }

    /// Open an existing database file without write access.
    pub fn open_read_only(path: &str) -> Result<Self> {
        let db = Database::open_read_only(path)?;
        Self::from_database(db)
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn from_database(db: Database) -> Result<Self> {
        let data_version = db.data_version()?;
        Ok(Self {
            db,
            subscribers: Vec::new(),
            data_version,
        })
    }

    /// Insert the default calendars when none exist. Returns how many were created.
    pub fn seed_default_calendars(&mut self) -> Result<usize> {
        let existing: i64 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM calendars", [], |row| row.get(0))
            .context("Failed to count calendars")?;

        if existing > 0 {
            return Ok(0);
        }

        for (title, color) in DEFAULT_CALENDARS {
            self.create_calendar(NewCalendar::new(title, color))?;
        }

        log::info!("Seeded {} default calendars", DEFAULT_CALENDARS.len());
        Ok(DEFAULT_CALENDARS.len())
    }

    pub fn create_calendar(&mut self, calendar: NewCalendar) -> Result<Calendar> {
        calendar.validate().map_err(|e| anyhow!(e))?;

        let color = crate::models::calendar::color_to_hex(calendar.color);
        self.db
            .connection()
            .execute(
                "INSERT INTO calendars (title, color) VALUES (?, ?)",
                params![calendar.title, color],
            )
            .context("Failed to insert calendar")?;

        Ok(Calendar::new(
            self.db.connection().last_insert_rowid(),
            calendar.title,
            calendar.color,
        ))
    }

    pub fn calendars(&self) -> Result<Vec<Calendar>> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT id, title, color FROM calendars ORDER BY id ASC")?;

        let calendars = stmt
            .query_map([], |row| {
                Ok(Calendar::new(
                    row.get(0)?,
                    row.get::<_, String>(1)?,
                    to_color(row.get::<_, String>(2)?),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(calendars)
    }

    /// Insert a new event and notify subscribers.
    pub fn insert_event(&mut self, event: NewEvent) -> Result<CalendarEvent> {
        event.validate().map_err(|e| anyhow!(e))?;

        self.db
            .connection()
            .execute(
                "INSERT INTO events (calendar_id, title, start_datetime, end_datetime, is_all_day)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    event.calendar_id,
                    event.title,
                    to_timestamp(event.start),
                    to_timestamp(event.end),
                    event.all_day as i32,
                ],
            )
            .context("Failed to insert event")?;

        let id = self.db.connection().last_insert_rowid();
        let created = self
            .get(id)?
            .ok_or_else(|| anyhow!("Event with id {} vanished after insert", id))?;

        self.notify(StoreChange::Saved(id));
        Ok(created)
    }

    /// Retrieve an event by ID.
    pub fn get(&self, id: i64) -> Result<Option<CalendarEvent>> {
        let result = self.db.connection().query_row(
            &format!(
                "SELECT {EVENT_COLUMNS}
                 FROM events e JOIN calendars c ON c.id = e.calendar_id
                 WHERE e.id = ?"
            ),
            [id],
            map_event_row,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn notify(&mut self, change: StoreChange) {
        self.subscribers.retain(|tx| tx.send(change).is_ok());
        // Our own commits do not bump data_version for this connection, so
        // the cached value stays valid.
    }
}

impl CalendarStore for SqliteCalendarStore {
    fn request_access(&mut self) -> Result<AccessStatus> {
        if self.db.is_read_only()? {
            log::info!("Calendar database opened read-only");
            Ok(AccessStatus::ReadOnly)
        } else {
            Ok(AccessStatus::FullAccess)
        }
    }

    fn events_in_range(&self, range: &DayRange) -> Result<Vec<CalendarEvent>> {
        let start = to_timestamp(range.start);
        let end = to_timestamp(range.end);

        let mut stmt = self.db.connection().prepare(&format!(
            "SELECT {EVENT_COLUMNS}
             FROM events e JOIN calendars c ON c.id = e.calendar_id
             WHERE (e.start_datetime < ?1 AND e.end_datetime > ?2)
                OR (e.start_datetime = e.end_datetime
                    AND e.start_datetime >= ?2 AND e.start_datetime < ?1)
             ORDER BY e.start_datetime ASC, e.id ASC"
        ))?;

        let events = stmt
            .query_map(params![end, start], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to load events for {}", range.date))?;

        Ok(events)
    }

    fn save(&mut self, event: &CalendarEvent, span: SaveSpan) -> Result<()> {
        if span == SaveSpan::FutureEvents {
            log::debug!("Event {} has no series; saving this occurrence only", event.id());
        }

        let rows_affected = self
            .db
            .connection()
            .execute(
                "UPDATE events SET
                    title = ?, start_datetime = ?, end_datetime = ?, is_all_day = ?,
                    updated_at = ?
                 WHERE id = ?",
                params![
                    event.title,
                    to_timestamp(event.start),
                    to_timestamp(event.end),
                    event.all_day as i32,
                    to_timestamp(Utc::now()),
                    event.id(),
                ],
            )
            .context("Failed to update event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", event.id()));
        }

        self.notify(StoreChange::Saved(event.id()));
        Ok(())
    }

    fn remove(&mut self, event_id: i64, _span: SaveSpan) -> Result<()> {
        let rows_affected = self
            .db
            .connection()
            .execute("DELETE FROM events WHERE id = ?", [event_id])
            .context("Failed to delete event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", event_id));
        }

        self.notify(StoreChange::Removed(event_id));
        Ok(())
    }

    fn subscribe(&mut self) -> Receiver<StoreChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn poll_external_changes(&mut self) -> Result<()> {
        let version = self.db.data_version()?;
        if version != self.data_version {
            log::debug!(
                "data_version moved from {} to {}",
                self.data_version,
                version
            );
            self.data_version = version;
            self.notify(StoreChange::External);
        }
        Ok(())
    }
}

fn map_event_row(row: &Row<'_>) -> Result<CalendarEvent, rusqlite::Error> {
    let calendar = Calendar::new(
        row.get(5)?,
        row.get::<_, String>(6)?,
        to_color(row.get::<_, String>(7)?),
    );

    Ok(CalendarEvent::new(
        row.get(0)?,
        row.get::<_, String>(1)?,
        to_utc_datetime(row.get::<_, String>(2)?)?,
        to_utc_datetime(row.get::<_, String>(3)?)?,
        calendar,
    )
    .with_all_day(row.get::<_, i32>(4)? != 0))
}

/// Fixed-width UTC form, to the nanosecond, so that text comparison orders like time.
fn to_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn to_utc_datetime(value: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn to_color(value: String) -> Color32 {
    parse_hex_color(&value).unwrap_or_else(|| {
        log::warn!("Unreadable calendar colour '{}', using default", value);
        DEFAULT_CALENDAR_COLOR
    })
}
