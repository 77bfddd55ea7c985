use chrono::NaiveDate;
use thiserror::Error;

/// Store-boundary failures, turned into UI state instead of crashes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Calendar access was denied")]
    PermissionDenied,

    #[error("Calendar is read-only")]
    ReadOnly,

    #[error("Could not load events for {date}: {message}")]
    QueryFailure { date: NaiveDate, message: String },

    #[error("Could not save event {event_id}: {message}")]
    SaveFailure { event_id: i64, message: String },

    #[error("Could not delete event {event_id}: {message}")]
    RemoveFailure { event_id: i64, message: String },
}
