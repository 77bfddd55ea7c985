use egui::{Color32, RichText, Vec2};

use crate::models::event::EventHandle;
use crate::timeline::DetailOptions;
use crate::utils::date::DisplayZone;

/// Result of one frame of the detail window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Save,
    Delete,
    Close,
}

/// Event detail window. Edits are held in buffers and written into the
/// event only on Save.
pub struct DetailWindow {
    event: EventHandle,
    options: DetailOptions,
    title: String,
    all_day: bool,
}

impl DetailWindow {
    pub fn new(event: EventHandle, options: DetailOptions) -> Self {
        let (title, all_day) = {
            let event = event.borrow();
            (event.title.clone(), event.all_day)
        };
        Self {
            event,
            options,
            title,
            all_day,
        }
    }

    pub fn event(&self) -> &EventHandle {
        &self.event
    }

    /// Copy the edit buffers into the event.
    pub fn apply_edits(&self) {
        let mut event = self.event.borrow_mut();
        event.title = self.title.trim().to_string();
        event.all_day = self.all_day;
    }

    pub fn show(&mut self, ctx: &egui::Context, zone: &DisplayZone) -> Option<DetailAction> {
        let mut open = true;
        let mut action = None;
        let event = self.event.borrow().clone();

        egui::Window::new("Event")
            .id(egui::Id::new(("event_detail", event.id())))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_size(Vec2::new(320.0, 0.0))
            .show(ctx, |ui| {
                if self.options.allows_editing {
                    ui.text_edit_singleline(&mut self.title);
                } else {
                    ui.heading(&event.title);
                }

                if self.options.allows_calendar_preview {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(Vec2::splat(12.0), egui::Sense::hover());
                        ui.painter().circle_filled(swatch.center(), 6.0, event.calendar.color);
                        ui.label(&event.calendar.title);
                    });
                }

                ui.separator();

                let start = zone.to_naive(event.start);
                let end = zone.to_naive(event.end);
                egui::Grid::new("event_detail_times")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Starts");
                        ui.label(start.format("%a %e %b %Y  %H:%M").to_string());
                        ui.end_row();
                        ui.label("Ends");
                        ui.label(end.format("%a %e %b %Y  %H:%M").to_string());
                        ui.end_row();
                    });

                if self.options.allows_editing {
                    ui.checkbox(&mut self.all_day, "All-day");
                } else if event.all_day {
                    ui.label("All-day");
                }

                if event.end < event.start {
                    ui.label(
                        RichText::new("Ends before it starts")
                            .color(Color32::from_rgb(255, 149, 0))
                            .small(),
                    );
                }

                if self.options.allows_editing {
                    ui.separator();
                    ui.horizontal(|ui| {
                        let can_save = !self.title.trim().is_empty();
                        if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                            action = Some(DetailAction::Save);
                        }
                        if ui.button("Delete").clicked() {
                            action = Some(DetailAction::Delete);
                        }
                    });
                }
            });

        if !open {
            return Some(DetailAction::Close);
        }
        action
    }
}
