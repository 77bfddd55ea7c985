//! Glue between a [`CalendarStore`](crate::services::store::CalendarStore)
//! and a day-timeline UI.
//!
//! [`EventAdapter`] presents store events the way the timeline wants them.
//! [`TimelineController`] answers the timeline's queries and turns its
//! gesture callbacks into edits against the store, replying with
//! [`TimelineCommand`]s for the UI to apply.

mod adapter;
pub mod colors;
mod command;
mod controller;
mod error;

pub use adapter::{AdapterId, AdapterKind, EventAdapter};
pub use command::{DetailOptions, TimelineCommand, TimelineState};
pub use controller::{EditSession, TimelineController};
pub use error::TimelineError;
