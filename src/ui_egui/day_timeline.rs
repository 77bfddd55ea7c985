use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use egui::{Align2, Color32, CursorIcon, FontId, Id, Pos2, Rect, RichText, Sense, Stroke, Vec2};

use super::gesture::{
    layout_columns, minutes_to_points, ColumnSlot, DragContext, DragMode, PressTracker,
    RESIZE_HANDLE_HEIGHT,
};
use crate::timeline::EventAdapter;
use crate::utils::date::{DayRange, DisplayZone};

const LABEL_WIDTH: f32 = 52.0;
const MIN_EVENT_HEIGHT: f32 = 18.0;
const EVENT_GAP: f32 = 2.0;

/// What the user did on the timeline this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineInput {
    /// Click on a settled event, by index into the shown events.
    Selected(usize),
    LongPressed(usize),
    /// The draft was dropped after a move or resize.
    DraftReleased,
    TappedElsewhere,
    DragBegan,
}

/// Gesture state that must survive between frames.
#[derive(Debug, Default)]
pub struct TimelineGestures {
    press: PressTracker,
    drag: Option<DragContext>,
}

impl TimelineGestures {
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }
}

/// One scrollable day: an all-day strip above an hour grid.
pub struct DayTimeline<'a> {
    pub range: &'a DayRange,
    pub zone: &'a DisplayZone,
    pub hour_height: f32,
    pub long_press: StdDuration,
}

impl DayTimeline<'_> {
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        events: &[EventAdapter],
        draft: Option<&EventAdapter>,
        gestures: &mut TimelineGestures,
    ) -> Vec<TimelineInput> {
        let mut inputs = Vec::new();
        let hidden = draft.and_then(|draft| draft.edited_event());

        let (all_day, timed): (Vec<usize>, Vec<usize>) =
            (0..events.len()).partition(|&index| events[index].is_all_day());

        if !all_day.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for &index in &all_day {
                    let response = all_day_chip(ui, &events[index]);
                    if response.clicked() {
                        inputs.push(TimelineInput::Selected(index));
                    }
                }
            });
            ui.separator();
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .drag_to_scroll(false)
            .show(ui, |ui| {
                let hours = self.range.duration().num_minutes() as f32 / 60.0;
                let size = Vec2::new(ui.available_width(), hours * self.hour_height);
                let (rect, background) = ui.allocate_exact_size(size, Sense::click_and_drag());
                self.paint_grid(ui, rect);

                if background.clicked() {
                    inputs.push(TimelineInput::TappedElsewhere);
                }
                if background.drag_started() {
                    inputs.push(TimelineInput::DragBegan);
                }
                if background.dragged() {
                    ui.scroll_with_delta(Vec2::new(0.0, background.drag_delta().y));
                }

                let lane = rect.with_min_x(rect.left() + LABEL_WIDTH);
                let intervals: Vec<_> = timed
                    .iter()
                    .map(|&index| (events[index].start_date(), events[index].end_date()))
                    .collect();
                let slots = layout_columns(&intervals);

                for (slot, &index) in slots.iter().zip(&timed) {
                    let adapter = &events[index];
                    if Some(adapter.id()) == hidden {
                        continue;
                    }

                    let event_rect = self.event_rect(lane, adapter, *slot);
                    let id = Id::new(("timeline_event", adapter.event_id()));
                    let response = ui.interact(event_rect, id, Sense::click());
                    paint_event(ui, event_rect, adapter, self.zone);

                    if response.is_pointer_button_down_on() {
                        let held = ui.input(|i| {
                            i.pointer
                                .press_start_time()
                                .map_or(0.0, |pressed| (i.time - pressed).max(0.0))
                        });
                        let held = StdDuration::from_secs_f64(held);
                        if gestures.press.update(adapter.event_id(), held, self.long_press) {
                            inputs.push(TimelineInput::LongPressed(index));
                        } else if !gestures.press.fired() {
                            ui.ctx().request_repaint_after(self.long_press.saturating_sub(held));
                        }
                    }

                    if response.clicked() && !gestures.press.fired() {
                        inputs.push(TimelineInput::Selected(index));
                    }
                }

                if let Some(draft) = draft {
                    if let Some(input) = self.show_draft(ui, lane, draft, gestures) {
                        inputs.push(input);
                    }
                }
            });

        if !ui.input(|i| i.pointer.any_down()) {
            gestures.press.release();
        }

        inputs
    }

    fn show_draft(
        &self,
        ui: &mut egui::Ui,
        lane: Rect,
        draft: &EventAdapter,
        gestures: &mut TimelineGestures,
    ) -> Option<TimelineInput> {
        let full_width = ColumnSlot {
            column: 0,
            columns: 1,
        };
        let rect = self.event_rect(lane, draft, full_width);
        let id = Id::new(("timeline_draft", draft.event_id()));
        let response = ui.interact(rect, id, Sense::drag());

        if response.drag_started() {
            let grab_y = response
                .interact_pointer_pos()
                .map_or(rect.center().y, |pos| pos.y);
            let mode = DragMode::for_grab(grab_y, rect.bottom());
            log::debug!("Dragging draft for event {} ({:?})", draft.event_id(), mode);
            gestures.drag = Some(DragContext::new(mode, draft.start_date(), draft.end_date()));
        }

        if let Some(drag) = &gestures.drag {
            if response.dragged() {
                let delta_y = ui.input(|i| match (i.pointer.press_origin(), i.pointer.interact_pos()) {
                    (Some(origin), Some(pos)) => pos.y - origin.y,
                    _ => 0.0,
                });
                let (start, end) = drag.apply(delta_y, self.hour_height);
                draft.set_start_date(start);
                draft.set_end_date(end);
                ui.ctx().set_cursor_icon(drag.mode.cursor_icon());
            }
        } else if let Some(hover) = response.hover_pos() {
            let icon = match DragMode::for_grab(hover.y, rect.bottom()) {
                DragMode::ResizeEnd => CursorIcon::ResizeVertical,
                DragMode::Move => CursorIcon::Grab,
            };
            ui.ctx().set_cursor_icon(icon);
        }

        // Repaint from the draft's current times so the block follows the pointer.
        let rect = self.event_rect(lane, draft, full_width);
        paint_event(ui, rect, draft, self.zone);
        let handle = Rect::from_center_size(
            Pos2::new(rect.center().x, rect.bottom() - RESIZE_HANDLE_HEIGHT / 2.0),
            Vec2::new(24.0, 3.0),
        );
        ui.painter().rect_filled(handle, 1.5, draft.text_color());

        if response.drag_stopped() {
            gestures.drag = None;
            return Some(TimelineInput::DraftReleased);
        }
        None
    }

    fn y_for(&self, top: f32, instant: DateTime<Utc>) -> f32 {
        let total = self.range.duration();
        let offset = (instant - self.range.start).clamp(Duration::zero(), total);
        top + minutes_to_points(offset.num_seconds() as f32 / 60.0, self.hour_height)
    }

    fn event_rect(&self, lane: Rect, adapter: &EventAdapter, slot: ColumnSlot) -> Rect {
        let top = self.y_for(lane.top(), adapter.start_date());
        let bottom = self
            .y_for(lane.top(), adapter.end_date())
            .max(top + MIN_EVENT_HEIGHT);

        let width = lane.width() / slot.columns as f32;
        let left = lane.left() + width * slot.column as f32;
        Rect::from_min_max(
            Pos2::new(left + EVENT_GAP, top),
            Pos2::new(left + width - EVENT_GAP, bottom),
        )
    }

    fn paint_grid(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        let visuals = ui.visuals();
        let line = Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color);
        let label_color = visuals.weak_text_color();

        let hours = (self.range.duration().num_minutes() + 59) / 60;
        for hour in 0..hours {
            let instant = self.range.start + Duration::hours(hour);
            let y = self.y_for(rect.top(), instant);
            painter.hline(rect.left() + LABEL_WIDTH..=rect.right(), y, line);
            painter.text(
                Pos2::new(rect.left() + 4.0, y + 2.0),
                Align2::LEFT_TOP,
                self.zone.to_naive(instant).format("%H:%M").to_string(),
                FontId::proportional(11.0),
                label_color,
            );
        }

        let now = Utc::now();
        if self.range.contains(now) {
            let y = self.y_for(rect.top(), now);
            painter.hline(
                rect.left() + LABEL_WIDTH..=rect.right(),
                y,
                Stroke::new(2.0, Color32::from_rgb(255, 59, 48)),
            );
        }
    }
}

fn paint_event(ui: &egui::Ui, rect: Rect, adapter: &EventAdapter, zone: &DisplayZone) {
    let painter = ui.painter().with_clip_rect(rect.intersect(ui.clip_rect()));
    painter.rect_filled(rect, 4.0, adapter.background_color());
    painter.rect_filled(
        Rect::from_min_size(rect.min, Vec2::new(3.0, rect.height())),
        0.0,
        adapter.color(),
    );

    let text_color = adapter.text_color();
    let title_pos = Pos2::new(rect.left() + 7.0, rect.top() + 2.0);
    painter.text(
        title_pos,
        Align2::LEFT_TOP,
        adapter.text(),
        FontId::proportional(13.0),
        text_color,
    );

    if rect.height() >= 34.0 {
        let times = format!(
            "{} - {}",
            zone.to_naive(adapter.start_date()).format("%H:%M"),
            zone.to_naive(adapter.end_date()).format("%H:%M")
        );
        painter.text(
            title_pos + Vec2::new(0.0, 16.0),
            Align2::LEFT_TOP,
            times,
            FontId::proportional(11.0),
            text_color,
        );
    }
}

fn all_day_chip(ui: &mut egui::Ui, adapter: &EventAdapter) -> egui::Response {
    egui::Frame::none()
        .fill(adapter.background_color())
        .rounding(4.0)
        .inner_margin(egui::Margin::symmetric(8.0, 3.0))
        .show(ui, |ui| {
            ui.label(RichText::new(adapter.text()).color(adapter.text_color()));
        })
        .response
        .interact(Sense::click())
}
