use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, NaiveDate};

use super::day_timeline::{DayTimeline, TimelineGestures, TimelineInput};
use super::detail_window::{DetailAction, DetailWindow};
use super::toast::ToastManager;
use crate::models::settings::TimelineSettings;
use crate::services::store::CalendarStore;
use crate::timeline::{EventAdapter, TimelineCommand, TimelineController, TimelineState};
use crate::utils::date::DayRange;

pub struct TimelineApp<S: CalendarStore> {
    controller: TimelineController<S>,
    settings: TimelineSettings,
    current_date: NaiveDate,
    /// Settled adapters for `current_date`, in store order.
    events: Vec<EventAdapter>,
    /// Draft standing in for one of `events` while it is edited.
    draft: Option<EventAdapter>,
    gestures: TimelineGestures,
    detail: Option<DetailWindow>,
    toasts: ToastManager,
    is_dark: bool,
    last_poll: Instant,
}

impl<S: CalendarStore> TimelineApp<S> {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: TimelineController<S>,
        settings: TimelineSettings,
    ) -> Self {
        let is_dark = match settings.dark_mode {
            Some(dark) => dark,
            None => matches!(dark_light::detect(), dark_light::Mode::Dark),
        };
        cc.egui_ctx.set_visuals(if is_dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let current_date = controller.zone().today();
        let mut app = Self {
            controller,
            settings,
            current_date,
            events: Vec::new(),
            draft: None,
            gestures: TimelineGestures::default(),
            detail: None,
            toasts: ToastManager::default(),
            is_dark,
            last_poll: Instant::now(),
        };

        let commands = app.controller.start();
        app.apply_commands(commands);
        app
    }

    fn apply_commands(&mut self, commands: Vec<TimelineCommand>) {
        for command in commands {
            match command {
                TimelineCommand::Reload => self.reload(),
                TimelineCommand::BeginEditing(draft) => {
                    self.gestures.cancel_drag();
                    self.draft = Some(draft);
                }
                TimelineCommand::EndEditing => {
                    self.gestures.cancel_drag();
                    self.draft = None;
                }
                TimelineCommand::PresentDetail { event, options } => {
                    self.detail = Some(DetailWindow::new(event, options));
                }
                TimelineCommand::SetState(state) => {
                    if state == TimelineState::ReadOnly {
                        self.toasts.info("Calendar is read-only");
                    }
                    if !state.shows_events() {
                        self.events.clear();
                        self.draft = None;
                    }
                }
                TimelineCommand::ShowError(error) => self.toasts.error(error.to_string()),
            }
        }
    }

    fn reload(&mut self) {
        self.events = self.controller.events_for_date(self.current_date);
    }

    fn go_to_date(&mut self, date: NaiveDate) {
        if date == self.current_date {
            return;
        }
        let commands = self.controller.on_tapped_elsewhere();
        self.apply_commands(commands);
        self.current_date = date;
        self.detail = None;
        self.reload();
    }

    fn poll_changes(&mut self, ctx: &egui::Context) {
        let interval = StdDuration::from_millis(self.settings.change_poll_millis.max(100));
        let elapsed = self.last_poll.elapsed();
        if elapsed >= interval {
            self.last_poll = Instant::now();
            let commands = self.controller.poll_store_changes();
            self.apply_commands(commands);
            ctx.request_repaint_after(interval);
        } else {
            ctx.request_repaint_after(interval - elapsed);
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut date = self.current_date;
            if ui.button("◀").on_hover_text("Previous day").clicked() {
                date -= Duration::days(1);
            }
            if ui.button("Today").clicked() {
                date = self.controller.zone().today();
            }
            if ui.button("▶").on_hover_text("Next day").clicked() {
                date += Duration::days(1);
            }
            ui.add(egui_extras::DatePickerButton::new(&mut date).id_source("timeline_date"));
            ui.heading(self.current_date.format("%A %e %B %Y").to_string());
            self.go_to_date(date);
        });
    }

    fn render_timeline(&mut self, ui: &mut egui::Ui) {
        match self.controller.state() {
            TimelineState::Pending => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            }
            TimelineState::Disabled => {
                ui.centered_and_justified(|ui| {
                    ui.label("Calendar access was denied. Events cannot be shown.");
                });
                return;
            }
            TimelineState::Interactive | TimelineState::ReadOnly => {}
        }

        if self.controller.state() == TimelineState::ReadOnly {
            ui.label(
                egui::RichText::new("Read-only calendar: events can be viewed but not changed")
                    .color(ui.visuals().warn_fg_color),
            );
        }

        if let Some(error) = self.controller.day_error() {
            ui.colored_label(ui.visuals().error_fg_color, error.to_string());
        }

        let range = DayRange::for_date(self.current_date, self.controller.zone());
        let timeline = DayTimeline {
            range: &range,
            zone: self.controller.zone(),
            hour_height: self.settings.hour_height,
            long_press: StdDuration::from_millis(self.settings.long_press_millis),
        };
        let inputs = timeline.show(ui, &self.events, self.draft.as_ref(), &mut self.gestures);

        for input in inputs {
            let commands = match input {
                TimelineInput::Selected(index) => match self.events.get(index) {
                    Some(adapter) => self.controller.on_event_selected(adapter),
                    None => Vec::new(),
                },
                TimelineInput::LongPressed(index) => match self.events.get(index) {
                    Some(adapter) => self.controller.on_event_long_pressed(adapter),
                    None => Vec::new(),
                },
                TimelineInput::DraftReleased => match &self.draft {
                    Some(draft) => self.controller.on_event_updated(draft),
                    None => Vec::new(),
                },
                TimelineInput::TappedElsewhere => self.controller.on_tapped_elsewhere(),
                TimelineInput::DragBegan => self.controller.on_drag_began(),
            };
            self.apply_commands(commands);
        }
    }

    fn render_detail(&mut self, ctx: &egui::Context) {
        let Some(detail) = &mut self.detail else {
            return;
        };

        let commands = match detail.show(ctx, self.controller.zone()) {
            Some(DetailAction::Save) => {
                detail.apply_edits();
                let event = detail.event().clone();
                self.detail = None;
                self.controller.save_event_details(&event)
            }
            Some(DetailAction::Delete) => {
                let event = detail.event().clone();
                self.detail = None;
                self.controller.remove_event(&event)
            }
            Some(DetailAction::Close) => {
                self.detail = None;
                Vec::new()
            }
            None => Vec::new(),
        };
        self.apply_commands(commands);
    }
}

impl<S: CalendarStore> eframe::App for TimelineApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_changes(ctx);

        egui::TopBottomPanel::top("timeline_header").show(ctx, |ui| {
            self.render_header(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_timeline(ui);
        });

        self.render_detail(ctx);
        self.toasts.render(ctx, self.is_dark);
    }
}
