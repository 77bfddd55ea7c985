// Event module
// Store-owned calendar events and the payloads used to create them

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::models::calendar::Calendar;

/// Shared in-memory reference to one store event.
///
/// Several adapters may wrap the same handle; writes through any of them are
/// visible to all. Nothing reaches the store until it is saved explicitly.
pub type EventHandle = Rc<RefCell<CalendarEvent>>;

/// A calendar event as returned by the store.
///
/// The identity is fixed at construction. Times and flags are freely mutable
/// and deliberately unvalidated: the store decides what it accepts on save.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    id: i64,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub calendar: Calendar,
}

impl CalendarEvent {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        calendar: Calendar,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            start,
            end,
            all_day: false,
            calendar,
        }
    }

    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Wrap into a fresh shared handle.
    pub fn into_handle(self) -> EventHandle {
        Rc::new(RefCell::new(self))
    }
}

/// Scope of a write against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveSpan {
    /// Only this occurrence.
    ThisEvent,
    /// This occurrence and every later one in its series.
    FutureEvents,
}

/// Payload for inserting a new event into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub calendar_id: i64,
}

impl NewEvent {
    /// Create a new event payload with required fields
    ///
    /// # Examples
    /// ```
    /// use calendar_timeline::models::event::NewEvent;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let event = NewEvent::new("Team Meeting", start, start + Duration::hours(1), 1).unwrap();
    /// assert!(!event.all_day);
    /// ```
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        calendar_id: i64,
    ) -> Result<Self, String> {
        let event = Self {
            title: title.into(),
            start,
            end,
            all_day: false,
            calendar_id,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.end < self.start {
            return Err("Event end time must not be before start time".to_string());
        }

        Ok(())
    }
}
