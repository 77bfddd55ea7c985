use super::adapter::EventAdapter;
use super::error::TimelineError;
use crate::models::event::EventHandle;

/// Interaction level of the timeline, decided by the store's access answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    /// Access has been requested but not answered.
    Pending,
    Interactive,
    /// Events are shown; edits are refused.
    ReadOnly,
    /// Nothing is shown.
    Disabled,
}

impl TimelineState {
    pub fn shows_events(&self) -> bool {
        matches!(self, Self::Interactive | Self::ReadOnly)
    }

    pub fn allows_editing(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// Flags for the event detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailOptions {
    pub allows_calendar_preview: bool,
    pub allows_editing: bool,
}

/// Instruction from the controller to the UI layer, applied in order.
#[derive(Debug)]
pub enum TimelineCommand {
    /// Re-run `events_for_date` for the visible day and re-render.
    Reload,
    /// Replace the original adapter with this draft.
    BeginEditing(EventAdapter),
    /// Drop the current draft, if any.
    EndEditing,
    PresentDetail {
        event: EventHandle,
        options: DetailOptions,
    },
    SetState(TimelineState),
    ShowError(TimelineError),
}
