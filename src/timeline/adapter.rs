use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use egui::Color32;

use super::colors::EventColors;
use crate::models::event::{CalendarEvent, EventHandle};

static NEXT_ADAPTER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdapterId(u64);

impl AdapterId {
    fn next() -> Self {
        Self(NEXT_ADAPTER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Whether an adapter is a settled event or a draft standing in for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Settled,
    Draft { original: AdapterId },
}

/// Link from a draft to the adapter it edits. Holds the original's identity
/// and the event it wraps, never the original adapter itself.
#[derive(Debug, Clone)]
struct EditedEvent {
    original: AdapterId,
    event: EventHandle,
}

/// Presents one store event through the interface the day timeline expects.
///
/// Start, end, all-day and title are read and written straight through to
/// the wrapped event. Nothing is cached and nothing is validated, so an end
/// before the start is passed along unchanged.
#[derive(Debug)]
pub struct EventAdapter {
    id: AdapterId,
    event: EventHandle,
    edited_event: Option<EditedEvent>,
    colors: EventColors,
}

impl EventAdapter {
    pub fn new(event: CalendarEvent) -> Self {
        Self::from_handle(event.into_handle())
    }

    pub fn from_handle(event: EventHandle) -> Self {
        let colors = EventColors::standard(event.borrow().calendar.color);
        Self {
            id: AdapterId::next(),
            event,
            edited_event: None,
            colors,
        }
    }

    pub fn id(&self) -> AdapterId {
        self.id
    }

    pub fn event(&self) -> &EventHandle {
        &self.event
    }

    pub fn event_id(&self) -> i64 {
        self.event.borrow().id()
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.event.borrow().start
    }

    pub fn set_start_date(&self, start: DateTime<Utc>) {
        self.event.borrow_mut().start = start;
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.event.borrow().end
    }

    pub fn set_end_date(&self, end: DateTime<Utc>) {
        self.event.borrow_mut().end = end;
    }

    pub fn is_all_day(&self) -> bool {
        self.event.borrow().all_day
    }

    pub fn set_all_day(&self, all_day: bool) {
        self.event.borrow_mut().all_day = all_day;
    }

    pub fn text(&self) -> String {
        self.event.borrow().title.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.event.borrow_mut().title = text.into();
    }

    /// The wrapped event's calendar colour.
    pub fn color(&self) -> Color32 {
        self.event.borrow().calendar.color
    }

    pub fn background_color(&self) -> Color32 {
        self.colors.background
    }

    pub fn text_color(&self) -> Color32 {
        self.colors.text
    }

    /// Identity of the adapter this draft edits, if any.
    pub fn edited_event(&self) -> Option<AdapterId> {
        self.edited_event.as_ref().map(|edited| edited.original)
    }

    pub(crate) fn edited_event_handle(&self) -> Option<&EventHandle> {
        self.edited_event.as_ref().map(|edited| &edited.event)
    }

    /// Point this adapter at the original it edits, or clear the link.
    /// Colours are recomputed immediately.
    pub fn set_edited_event(&mut self, original: Option<&EventAdapter>) {
        self.edited_event = original.map(|original| EditedEvent {
            original: original.id,
            event: original.event.clone(),
        });
        self.update_colors();
    }

    pub fn is_editing(&self) -> bool {
        self.edited_event.is_some()
    }

    pub fn kind(&self) -> AdapterKind {
        match self.edited_event() {
            Some(original) => AdapterKind::Draft { original },
            None => AdapterKind::Settled,
        }
    }

    /// A draft wrapping the same event, linked back to `self`.
    pub fn make_editable(&self) -> EventAdapter {
        let mut draft = EventAdapter::from_handle(self.event.clone());
        draft.set_edited_event(Some(self));
        draft
    }

    /// Copy this draft's start and end into the original. Does not persist.
    pub fn commit_editing(&self) {
        let Some(edited) = &self.edited_event else {
            return;
        };

        let (start, end) = (self.start_date(), self.end_date());
        let mut target = edited.event.borrow_mut();
        target.start = start;
        target.end = end;
    }

    fn update_colors(&mut self) {
        let color = self.color();
        self.colors = if self.edited_event.is_some() {
            EventColors::editing(color)
        } else {
            EventColors::standard(color)
        };
    }
}
