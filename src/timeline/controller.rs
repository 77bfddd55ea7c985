use std::sync::mpsc::Receiver;

use chrono::{DateTime, NaiveDate, Utc};

use super::adapter::{AdapterId, EventAdapter};
use super::command::{DetailOptions, TimelineCommand, TimelineState};
use super::error::TimelineError;
use crate::models::event::{EventHandle, SaveSpan};
use crate::services::store::{AccessStatus, CalendarStore, StoreChange};
use crate::utils::date::{DayRange, DisplayZone};

/// The one edit in flight: which adapter is being edited, by which draft,
/// and the times to restore if the draft is thrown away.
#[derive(Debug, Clone)]
pub struct EditSession {
    original: AdapterId,
    draft: AdapterId,
    event: EventHandle,
    original_start: DateTime<Utc>,
    original_end: DateTime<Utc>,
}

impl EditSession {
    pub fn original(&self) -> AdapterId {
        self.original
    }

    pub fn draft(&self) -> AdapterId {
        self.draft
    }

    pub fn event_id(&self) -> i64 {
        self.event.borrow().id()
    }

    fn restore(&self) {
        let mut event = self.event.borrow_mut();
        event.start = self.original_start;
        event.end = self.original_end;
    }
}

/// Owns the store connection and drives the day timeline.
///
/// Every callback returns the commands the UI must apply, in order. Store
/// failures never escape as panics; they come back as
/// [`TimelineCommand::ShowError`] and are kept in [`last_error`](Self::last_error).
pub struct TimelineController<S: CalendarStore> {
    store: S,
    zone: DisplayZone,
    changes: Receiver<StoreChange>,
    state: TimelineState,
    visible_date: Option<NaiveDate>,
    session: Option<EditSession>,
    reload_deferred: bool,
    day_error: Option<TimelineError>,
    last_error: Option<TimelineError>,
}

impl<S: CalendarStore> TimelineController<S> {
    /// Wrap a store and subscribe to its change notifications.
    pub fn new(mut store: S, zone: DisplayZone) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            zone,
            changes,
            state: TimelineState::Pending,
            visible_date: None,
            session: None,
            reload_deferred: false,
            day_error: None,
            last_error: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn zone(&self) -> &DisplayZone {
        &self.zone
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn visible_date(&self) -> Option<NaiveDate> {
        self.visible_date
    }

    pub fn editing_session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Failure of the most recent `events_for_date`, if it failed.
    pub fn day_error(&self) -> Option<&TimelineError> {
        self.day_error.as_ref()
    }

    pub fn last_error(&self) -> Option<&TimelineError> {
        self.last_error.as_ref()
    }

    /// Ask the store for access. The timeline stays `Pending` until the answer is applied.
    pub fn start(&mut self) -> Vec<TimelineCommand> {
        log::info!("Requesting calendar access");
        let result = self.store.request_access();
        self.apply_access_result(result)
    }

    pub fn apply_access_result(
        &mut self,
        result: anyhow::Result<AccessStatus>,
    ) -> Vec<TimelineCommand> {
        let state = match result {
            Ok(AccessStatus::FullAccess) => TimelineState::Interactive,
            Ok(AccessStatus::ReadOnly) => TimelineState::ReadOnly,
            Ok(AccessStatus::Denied) => {
                log::warn!("Calendar access denied");
                TimelineState::Disabled
            }
            Err(e) => {
                log::error!("Calendar access request failed: {:#}", e);
                TimelineState::Disabled
            }
        };

        log::info!("Timeline state: {:?}", state);
        self.state = state;

        let mut commands = vec![TimelineCommand::SetState(state)];
        if !state.allows_editing() {
            let discarded = self.discard_session();
            commands.extend(
                discarded
                    .into_iter()
                    .filter(|command| matches!(command, TimelineCommand::EndEditing)),
            );
        }
        if state.shows_events() {
            commands.push(TimelineCommand::Reload);
        } else {
            commands.push(self.record_error(TimelineError::PermissionDenied));
        }
        commands
    }

    /// Wrap every event intersecting `date` (in the display zone) in a fresh adapter.
    ///
    /// Order is whatever the store returns. A failed query yields no events
    /// and sets [`day_error`](Self::day_error).
    pub fn events_for_date(&mut self, date: NaiveDate) -> Vec<EventAdapter> {
        self.visible_date = Some(date);

        if !self.state.shows_events() {
            return Vec::new();
        }

        let range = DayRange::for_date(date, &self.zone);
        match self.store.events_in_range(&range) {
            Ok(events) => {
                self.day_error = None;
                log::debug!("Loaded {} events for {}", events.len(), date);
                events.into_iter().map(EventAdapter::new).collect()
            }
            Err(e) => {
                log::error!("Failed to load events for {}: {:#}", date, e);
                let error = TimelineError::QueryFailure {
                    date,
                    message: format!("{:#}", e),
                };
                self.day_error = Some(error.clone());
                self.last_error = Some(error);
                Vec::new()
            }
        }
    }

    /// Drain store notifications. Any change reloads the visible day, unless
    /// a draft is open, in which case the reload waits for the draft to resolve.
    pub fn poll_store_changes(&mut self) -> Vec<TimelineCommand> {
        if let Err(e) = self.store.poll_external_changes() {
            log::warn!("Failed to check for external calendar changes: {:#}", e);
        }

        let mut changed = false;
        for change in self.changes.try_iter() {
            log::debug!("Store change: {:?}", change);
            changed = true;
        }

        if !changed || !self.state.shows_events() {
            return Vec::new();
        }

        self.reload_unless_editing()
    }

    pub fn on_event_selected(&self, adapter: &EventAdapter) -> Vec<TimelineCommand> {
        if !self.state.shows_events() {
            return Vec::new();
        }

        vec![TimelineCommand::PresentDetail {
            event: adapter.event().clone(),
            options: DetailOptions {
                allows_calendar_preview: true,
                allows_editing: self.state.allows_editing(),
            },
        }]
    }

    /// Throw away any open draft and start editing `adapter` through a new one.
    pub fn on_event_long_pressed(&mut self, adapter: &EventAdapter) -> Vec<TimelineCommand> {
        if !self.state.allows_editing() {
            return self.refuse_edit();
        }

        let deferred = self.reload_deferred;
        let mut commands = self.discard_session();
        // The next draft keeps any reload that was waiting on the previous one.
        commands.retain(|command| !matches!(command, TimelineCommand::Reload));
        self.reload_deferred = deferred;

        let draft = adapter.make_editable();
        log::debug!(
            "Editing event {} (adapter {:?}, draft {:?})",
            adapter.event_id(),
            adapter.id(),
            draft.id()
        );
        self.session = Some(EditSession {
            original: adapter.id(),
            draft: draft.id(),
            event: adapter.event().clone(),
            original_start: adapter.start_date(),
            original_end: adapter.end_date(),
        });

        commands.push(TimelineCommand::BeginEditing(draft));
        commands
    }

    /// Commit a draft into its original and persist it for this occurrence only.
    ///
    /// On failure the draft stays open so the edit is not lost.
    pub fn on_event_updated(&mut self, descriptor: &EventAdapter) -> Vec<TimelineCommand> {
        let Some(target) = descriptor.edited_event_handle() else {
            log::debug!("Update for settled event {}, nothing to commit", descriptor.event_id());
            return Vec::new();
        };

        if !self.state.allows_editing() {
            return self.refuse_edit();
        }

        descriptor.commit_editing();
        let event = target.borrow().clone();

        if let Err(e) = self.store.save(&event, SaveSpan::ThisEvent) {
            log::error!("Failed to save event {}: {:#}", event.id(), e);
            return vec![self.record_error(TimelineError::SaveFailure {
                event_id: event.id(),
                message: format!("{:#}", e),
            })];
        }

        log::info!(
            "Saved event {} ({} - {})",
            event.id(),
            event.start,
            event.end
        );

        let mut commands = Vec::new();
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.draft == descriptor.id())
        {
            self.session = None;
            commands.push(TimelineCommand::EndEditing);
        }
        self.reload_deferred = false;
        commands.push(TimelineCommand::Reload);
        commands
    }

    /// A tap outside any event discards the open draft.
    pub fn on_tapped_elsewhere(&mut self) -> Vec<TimelineCommand> {
        self.discard_session()
    }

    /// Starting to drag the timeline itself discards the open draft.
    pub fn on_drag_began(&mut self) -> Vec<TimelineCommand> {
        self.discard_session()
    }

    /// Persist edits made in the detail view.
    ///
    /// An open draft is left alone and the reload waits for it to resolve.
    pub fn save_event_details(&mut self, event: &EventHandle) -> Vec<TimelineCommand> {
        if !self.state.allows_editing() {
            return self.refuse_edit();
        }

        let snapshot = event.borrow().clone();
        match self.store.save(&snapshot, SaveSpan::ThisEvent) {
            Ok(()) => {
                log::info!("Saved details of event {}", snapshot.id());
                self.reload_unless_editing()
            }
            Err(e) => {
                log::error!("Failed to save event {}: {:#}", snapshot.id(), e);
                vec![self.record_error(TimelineError::SaveFailure {
                    event_id: snapshot.id(),
                    message: format!("{:#}", e),
                })]
            }
        }
    }

    /// Delete an event from the detail view.
    pub fn remove_event(&mut self, event: &EventHandle) -> Vec<TimelineCommand> {
        if !self.state.allows_editing() {
            return self.refuse_edit();
        }

        let event_id = event.borrow().id();
        if let Err(e) = self.store.remove(event_id, SaveSpan::ThisEvent) {
            log::error!("Failed to delete event {}: {:#}", event_id, e);
            return vec![self.record_error(TimelineError::RemoveFailure {
                event_id,
                message: format!("{:#}", e),
            })];
        }

        log::info!("Deleted event {}", event_id);

        if self
            .session
            .as_ref()
            .is_some_and(|session| session.event_id() == event_id)
        {
            self.session = None;
            self.reload_deferred = false;
            return vec![TimelineCommand::EndEditing, TimelineCommand::Reload];
        }
        self.reload_unless_editing()
    }

    /// A reload now, or a deferred one while a draft is open.
    fn reload_unless_editing(&mut self) -> Vec<TimelineCommand> {
        if self.session.is_some() {
            log::debug!("Deferring reload until the open draft is resolved");
            self.reload_deferred = true;
            return Vec::new();
        }
        vec![TimelineCommand::Reload]
    }

    fn discard_session(&mut self) -> Vec<TimelineCommand> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };

        log::debug!("Discarding draft {:?} for event {}", session.draft, session.event_id());
        session.restore();
        self.reload_deferred = false;

        vec![TimelineCommand::EndEditing, TimelineCommand::Reload]
    }

    fn refuse_edit(&mut self) -> Vec<TimelineCommand> {
        match self.state {
            TimelineState::ReadOnly => vec![self.record_error(TimelineError::ReadOnly)],
            _ => Vec::new(),
        }
    }

    fn record_error(&mut self, error: TimelineError) -> TimelineCommand {
        self.last_error = Some(error.clone());
        TimelineCommand::ShowError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::Calendar;
    use crate::models::event::CalendarEvent;
    use crate::services::store::MockCalendarStore;
    use anyhow::anyhow;
    use chrono::TimeZone;
    use egui::Color32;
    use std::sync::mpsc::{self, Sender};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
    }

    fn june_2() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn event(id: i64, start: u32, end: u32) -> CalendarEvent {
        CalendarEvent::new(id, format!("Event {id}"), at(start), at(end), Calendar::new(1, "Personal", Color32::RED))
    }

    fn mock_store() -> (MockCalendarStore, Sender<StoreChange>) {
        let (tx, rx) = mpsc::channel();
        let mut store = MockCalendarStore::new();
        store.expect_subscribe().times(1).return_once(move || rx);
        store
            .expect_poll_external_changes()
            .returning(|| Ok(()));
        (store, tx)
    }

    fn controller_with(store: MockCalendarStore, access: AccessStatus) -> TimelineController<MockCalendarStore> {
        let mut controller = TimelineController::new(store, DisplayZone::Named(chrono_tz::UTC));
        controller.apply_access_result(Ok(access));
        controller
    }

    #[test]
    fn test_starts_pending_and_requests_access() {
        let (mut store, _tx) = mock_store();
        store
            .expect_request_access()
            .times(1)
            .returning(|| Ok(AccessStatus::FullAccess));

        let mut controller = TimelineController::new(store, DisplayZone::Named(chrono_tz::UTC));
        assert_eq!(controller.state(), TimelineState::Pending);

        let commands = controller.start();
        assert_eq!(controller.state(), TimelineState::Interactive);
        assert!(matches!(commands[0], TimelineCommand::SetState(TimelineState::Interactive)));
        assert!(matches!(commands[1], TimelineCommand::Reload));
    }

    #[test]
    fn test_pending_shows_nothing_without_query() {
        let (mut store, _tx) = mock_store();
        store.expect_events_in_range().never();

        let mut controller = TimelineController::new(store, DisplayZone::Named(chrono_tz::UTC));
        assert!(controller.events_for_date(june_2()).is_empty());
        assert_eq!(controller.visible_date(), Some(june_2()));
    }

    #[test]
    fn test_denied_access_disables_timeline() {
        let (mut store, _tx) = mock_store();
        store.expect_events_in_range().never();

        let mut controller = TimelineController::new(store, DisplayZone::Named(chrono_tz::UTC));
        let commands = controller.apply_access_result(Ok(AccessStatus::Denied));

        assert_eq!(controller.state(), TimelineState::Disabled);
        assert!(matches!(
            commands.last(),
            Some(TimelineCommand::ShowError(TimelineError::PermissionDenied))
        ));
        assert!(controller.events_for_date(june_2()).is_empty());
    }

    #[test]
    fn test_failed_access_request_disables_timeline() {
        let (store, _tx) = mock_store();
        let mut controller = TimelineController::new(store, DisplayZone::Named(chrono_tz::UTC));
        controller.apply_access_result(Err(anyhow!("no calendar service")));

        assert_eq!(controller.state(), TimelineState::Disabled);
        assert_eq!(controller.last_error(), Some(&TimelineError::PermissionDenied));
    }

    #[test]
    fn test_events_for_date_queries_one_day() {
        let (mut store, _tx) = mock_store();
        store
            .expect_events_in_range()
            .withf(|range: &DayRange| {
                range.start == at(0) && range.end == at(0) + chrono::Duration::days(1)
            })
            .times(1)
            .returning(|_| Ok(vec![event(2, 14, 15), event(1, 9, 10)]));

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let adapters = controller.events_for_date(june_2());

        let ids: Vec<i64> = adapters.iter().map(|a| a.event_id()).collect();
        assert_eq!(ids, vec![2, 1], "Store order is kept");
        assert!(controller.day_error().is_none());
    }

    #[test]
    fn test_query_failure_yields_empty_day() {
        let (mut store, _tx) = mock_store();
        store
            .expect_events_in_range()
            .returning(|_| Err(anyhow!("database is locked")));

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        assert!(controller.events_for_date(june_2()).is_empty());
        assert!(matches!(
            controller.day_error(),
            Some(TimelineError::QueryFailure { date, .. }) if *date == june_2()
        ));
    }

    #[test]
    fn test_selection_presents_detail() {
        let (store, _tx) = mock_store();
        let controller = controller_with(store, AccessStatus::ReadOnly);
        let adapter = EventAdapter::new(event(1, 9, 10));

        let commands = controller.on_event_selected(&adapter);
        match &commands[..] {
            [TimelineCommand::PresentDetail { event, options }] => {
                assert!(std::rc::Rc::ptr_eq(event, adapter.event()));
                assert!(options.allows_calendar_preview);
                assert!(!options.allows_editing);
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_long_press_begins_editing() {
        let (store, _tx) = mock_store();
        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let adapter = EventAdapter::new(event(1, 9, 10));

        let commands = controller.on_event_long_pressed(&adapter);
        match &commands[..] {
            [TimelineCommand::BeginEditing(draft)] => {
                assert_eq!(draft.edited_event(), Some(adapter.id()));
                assert_eq!(controller.editing_session().unwrap().draft(), draft.id());
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_long_press_refused_when_read_only() {
        let (store, _tx) = mock_store();
        let mut controller = controller_with(store, AccessStatus::ReadOnly);
        let adapter = EventAdapter::new(event(1, 9, 10));

        let commands = controller.on_event_long_pressed(&adapter);
        assert!(matches!(&commands[..], [TimelineCommand::ShowError(TimelineError::ReadOnly)]));
        assert!(!controller.is_editing());
    }

    #[test]
    fn test_new_long_press_discards_previous_draft() {
        let (store, _tx) = mock_store();
        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let first = EventAdapter::new(event(1, 9, 10));
        let second = EventAdapter::new(event(2, 13, 14));

        let commands = controller.on_event_long_pressed(&first);
        let TimelineCommand::BeginEditing(first_draft) = &commands[0] else {
            panic!("expected a draft");
        };
        first_draft.set_start_date(at(16));
        first_draft.set_end_date(at(17));

        let commands = controller.on_event_long_pressed(&second);
        assert!(matches!(commands[0], TimelineCommand::EndEditing));
        assert!(matches!(commands[1], TimelineCommand::BeginEditing(_)));
        assert_eq!(first.start_date(), at(9), "Discarded draft is rolled back");
        assert_eq!(first.end_date(), at(10));
        assert_eq!(controller.editing_session().unwrap().original(), second.id());
    }

    #[test]
    fn test_update_commits_and_persists_this_event() {
        let (mut store, _tx) = mock_store();
        store
            .expect_save()
            .withf(|event: &CalendarEvent, span: &SaveSpan| {
                event.id() == 1 && event.start == at(11) && event.end == at(12) && *span == SaveSpan::ThisEvent
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let original = EventAdapter::new(event(1, 9, 10));
        let mut commands = controller.on_event_long_pressed(&original);
        let Some(TimelineCommand::BeginEditing(draft)) = commands.pop() else {
            panic!("expected a draft");
        };

        draft.set_start_date(at(11));
        draft.set_end_date(at(12));
        let commands = controller.on_event_updated(&draft);

        assert!(matches!(commands[0], TimelineCommand::EndEditing));
        assert!(matches!(commands[1], TimelineCommand::Reload));
        assert!(!controller.is_editing());
        assert_eq!(original.start_date(), at(11));
    }

    #[test]
    fn test_update_on_settled_event_does_nothing() {
        let (mut store, _tx) = mock_store();
        store.expect_save().never();

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let adapter = EventAdapter::new(event(1, 9, 10));
        assert!(controller.on_event_updated(&adapter).is_empty());
    }

    #[test]
    fn test_save_failure_keeps_draft() {
        let (mut store, _tx) = mock_store();
        store
            .expect_save()
            .returning(|_, _| Err(anyhow!("disk full")));

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let original = EventAdapter::new(event(1, 9, 10));
        let mut commands = controller.on_event_long_pressed(&original);
        let Some(TimelineCommand::BeginEditing(draft)) = commands.pop() else {
            panic!("expected a draft");
        };

        draft.set_start_date(at(11));
        let commands = controller.on_event_updated(&draft);

        match &commands[..] {
            [TimelineCommand::ShowError(TimelineError::SaveFailure { event_id, message })] => {
                assert_eq!(*event_id, 1);
                assert!(message.contains("disk full"));
            }
            other => panic!("unexpected commands: {:?}", other),
        }
        assert_eq!(controller.editing_session().unwrap().draft(), draft.id());
    }

    #[test]
    fn test_tap_elsewhere_discards_draft() {
        let (mut store, _tx) = mock_store();
        store.expect_save().never();

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let original = EventAdapter::new(event(1, 9, 10));
        controller.on_event_long_pressed(&original);

        let commands = controller.on_tapped_elsewhere();
        assert!(matches!(
            &commands[..],
            [TimelineCommand::EndEditing, TimelineCommand::Reload]
        ));
        assert!(!controller.is_editing());
        assert_eq!(original.start_date(), at(9));
        assert!(controller.on_drag_began().is_empty(), "Nothing left to discard");
    }

    #[test]
    fn test_store_change_reloads() {
        let (store, tx) = mock_store();
        let mut controller = controller_with(store, AccessStatus::FullAccess);

        assert!(controller.poll_store_changes().is_empty());

        tx.send(StoreChange::External).unwrap();
        tx.send(StoreChange::Saved(3)).unwrap();
        let commands = controller.poll_store_changes();
        assert!(matches!(&commands[..], [TimelineCommand::Reload]), "One reload per batch");
    }

    #[test]
    fn test_store_change_deferred_while_editing() {
        let (store, tx) = mock_store();
        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let original = EventAdapter::new(event(1, 9, 10));
        controller.on_event_long_pressed(&original);

        tx.send(StoreChange::External).unwrap();
        assert!(controller.poll_store_changes().is_empty());

        let commands = controller.on_drag_began();
        assert!(matches!(
            &commands[..],
            [TimelineCommand::EndEditing, TimelineCommand::Reload]
        ));
    }

    #[test]
    fn test_deferred_reload_survives_draft_switch() {
        let (store, tx) = mock_store();
        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let first = EventAdapter::new(event(1, 9, 10));
        let second = EventAdapter::new(event(2, 13, 14));
        controller.on_event_long_pressed(&first);

        tx.send(StoreChange::External).unwrap();
        controller.poll_store_changes();

        let commands = controller.on_event_long_pressed(&second);
        assert!(!commands.iter().any(|c| matches!(c, TimelineCommand::Reload)));

        let commands = controller.on_tapped_elsewhere();
        assert!(matches!(
            &commands[..],
            [TimelineCommand::EndEditing, TimelineCommand::Reload]
        ));
    }

    #[test]
    fn test_remove_event_ends_matching_session() {
        let (mut store, _tx) = mock_store();
        store
            .expect_remove()
            .withf(|id: &i64, span: &SaveSpan| *id == 1 && *span == SaveSpan::ThisEvent)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let original = EventAdapter::new(event(1, 9, 10));
        controller.on_event_long_pressed(&original);

        let commands = controller.remove_event(original.event());
        assert!(matches!(
            &commands[..],
            [TimelineCommand::EndEditing, TimelineCommand::Reload]
        ));
        assert!(!controller.is_editing());
    }

    #[test]
    fn test_events_for_date_spans_short_dst_day() {
        let (mut store, _tx) = mock_store();
        store
            .expect_events_in_range()
            .withf(|range: &DayRange| {
                range.start == Utc.with_ymd_and_hms(2025, 3, 9, 5, 0, 0).unwrap()
                    && range.end == Utc.with_ymd_and_hms(2025, 3, 10, 4, 0, 0).unwrap()
                    && range.duration() == chrono::Duration::hours(23)
            })
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let mut controller =
            TimelineController::new(store, DisplayZone::Named(chrono_tz::America::New_York));
        controller.apply_access_result(Ok(AccessStatus::FullAccess));

        let spring_forward = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert!(controller.events_for_date(spring_forward).is_empty());
        assert!(controller.day_error().is_none());
    }

    #[test]
    fn test_save_details_of_other_event_defers_reload_while_editing() {
        let (mut store, _tx) = mock_store();
        store
            .expect_save()
            .withf(|event: &CalendarEvent, _: &SaveSpan| event.id() == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let first = EventAdapter::new(event(1, 9, 10));
        let second = EventAdapter::new(event(2, 13, 14));
        controller.on_event_long_pressed(&first);

        second.set_text("Renamed");
        let commands = controller.save_event_details(second.event());
        assert!(commands.is_empty(), "unexpected commands: {:?}", commands);
        assert_eq!(controller.editing_session().unwrap().original(), first.id());

        let commands = controller.on_tapped_elsewhere();
        assert!(matches!(
            &commands[..],
            [TimelineCommand::EndEditing, TimelineCommand::Reload]
        ));
    }

    #[test]
    fn test_remove_other_event_keeps_draft_and_defers_reload() {
        let (mut store, _tx) = mock_store();
        store
            .expect_remove()
            .withf(|id: &i64, _: &SaveSpan| *id == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let first = EventAdapter::new(event(1, 9, 10));
        let second = EventAdapter::new(event(2, 13, 14));
        controller.on_event_long_pressed(&first);

        let commands = controller.remove_event(second.event());
        assert!(commands.is_empty(), "unexpected commands: {:?}", commands);
        assert!(controller.is_editing());

        // The deferred reload outlives a switch to a new draft.
        let third = EventAdapter::new(event(3, 15, 16));
        let commands = controller.on_event_long_pressed(&third);
        assert!(!commands.iter().any(|c| matches!(c, TimelineCommand::Reload)));
        let commands = controller.on_drag_began();
        assert!(matches!(
            &commands[..],
            [TimelineCommand::EndEditing, TimelineCommand::Reload]
        ));
    }

    #[test]
    fn test_save_details_failure_is_reported() {
        let (mut store, _tx) = mock_store();
        store
            .expect_save()
            .returning(|_, _| Err(anyhow!("constraint failed")));

        let mut controller = controller_with(store, AccessStatus::FullAccess);
        let adapter = EventAdapter::new(event(1, 9, 10));
        adapter.set_text("Renamed");

        let commands = controller.save_event_details(adapter.event());
        assert!(matches!(
            &commands[..],
            [TimelineCommand::ShowError(TimelineError::SaveFailure { event_id: 1, .. })]
        ));
    }
}
