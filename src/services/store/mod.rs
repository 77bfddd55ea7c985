//! Outbound seam to the calendar store.
//!
//! The timeline never talks to a database directly; it asks a
//! [`CalendarStore`] for access, queries events by day and saves edits back.
//! [`SqliteCalendarStore`] is the implementation shipped with the app.

use std::sync::mpsc::Receiver;

use anyhow::Result;

use crate::models::event::{CalendarEvent, SaveSpan};
use crate::utils::date::DayRange;

mod sqlite;

pub use sqlite::SqliteCalendarStore;

/// Outcome of asking the store for event access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    FullAccess,
    ReadOnly,
    Denied,
}

/// Notification that store contents changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Saved(i64),
    Removed(i64),
    /// Another writer changed the store; affected events are unknown.
    External,
}

#[cfg_attr(test, mockall::automock)]
pub trait CalendarStore {
    /// Ask for read/write access to events.
    fn request_access(&mut self) -> Result<AccessStatus>;

    /// Every event, across all calendars, whose interval intersects `range`.
    fn events_in_range(&self, range: &DayRange) -> Result<Vec<CalendarEvent>>;

    /// Persist title, times and all-day flag of an existing event.
    fn save(&mut self, event: &CalendarEvent, span: SaveSpan) -> Result<()>;

    fn remove(&mut self, event_id: i64, span: SaveSpan) -> Result<()>;

    /// Register for change notifications.
    fn subscribe(&mut self) -> Receiver<StoreChange>;

    /// Check for writes made outside this handle and notify subscribers.
    fn poll_external_changes(&mut self) -> Result<()> {
        Ok(())
    }
}
