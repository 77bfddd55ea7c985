//! Brief, self-dismissing messages for store errors and state changes.

use egui::{Align2, Color32, Context, RichText, Stroke};
use std::time::{Duration, Instant};

use crate::timeline::colors::with_alpha;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

impl ToastLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Info => "ℹ",
            ToastLevel::Error => "✗",
        }
    }

    pub fn background_color(&self, is_dark_theme: bool) -> Color32 {
        match (self, is_dark_theme) {
            (ToastLevel::Info, true) => Color32::from_rgb(30, 50, 80),
            (ToastLevel::Error, true) => Color32::from_rgb(80, 30, 30),
            (ToastLevel::Info, false) => Color32::from_rgb(220, 235, 255),
            (ToastLevel::Error, false) => Color32::from_rgb(255, 220, 220),
        }
    }

    pub fn text_color(&self, is_dark_theme: bool) -> Color32 {
        match (self, is_dark_theme) {
            (ToastLevel::Info, true) => Color32::from_rgb(100, 180, 255),
            (ToastLevel::Error, true) => Color32::from_rgb(255, 120, 120),
            (ToastLevel::Info, false) => Color32::from_rgb(30, 80, 150),
            (ToastLevel::Error, false) => Color32::from_rgb(180, 40, 40),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        let duration = match level {
            ToastLevel::Info => Duration::from_secs(3),
            ToastLevel::Error => Duration::from_secs(6),
        };
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Fades out over the last half second.
    pub fn opacity(&self) -> f32 {
        let elapsed = self.created_at.elapsed();
        let fade_start = self.duration.saturating_sub(Duration::from_millis(500));

        if elapsed >= self.duration {
            0.0
        } else if elapsed >= fade_start {
            ((self.duration - elapsed).as_secs_f32() / 0.5).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn info(&mut self, message: impl Into<String>) {
        self.toasts.push(Toast::new(message, ToastLevel::Info));
    }

    /// Identical errors already on screen are not stacked again.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self
            .toasts
            .iter()
            .any(|toast| toast.level == ToastLevel::Error && toast.message == message)
        {
            return;
        }
        self.toasts.push(Toast::new(message, ToastLevel::Error));
    }

    /// Drop expired toasts and draw the rest stacked in the bottom-right corner, newest last.
    pub fn render(&mut self, ctx: &Context, is_dark_theme: bool) {
        self.toasts.retain(|toast| !toast.is_expired());
        if self.toasts.is_empty() {
            return;
        }

        // Keep repainting while anything is fading.
        ctx.request_repaint();

        egui::Area::new(egui::Id::new("timeline_toasts"))
            .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-TOAST_MARGIN, -TOAST_MARGIN))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                ui.set_max_width(TOAST_WIDTH);
                ui.spacing_mut().item_spacing.y = 6.0;
                for toast in &self.toasts {
                    show_toast(ui, toast, is_dark_theme);
                }
            });
    }
}

const TOAST_WIDTH: f32 = 320.0;
const TOAST_MARGIN: f32 = 12.0;

/// Fill and text colour of a toast at `opacity`.
fn toast_colors(level: ToastLevel, is_dark_theme: bool, opacity: f32) -> (Color32, Color32) {
    let fill = with_alpha(level.background_color(is_dark_theme), 0.9 * opacity);
    let text = level.text_color(is_dark_theme).gamma_multiply(opacity);
    (fill, text)
}

fn show_toast(ui: &mut egui::Ui, toast: &Toast, is_dark_theme: bool) {
    let (fill, text) = toast_colors(toast.level, is_dark_theme, toast.opacity());

    egui::Frame::popup(ui.style())
        .fill(fill)
        .stroke(Stroke::new(1.0, text.gamma_multiply(0.3)))
        .show(ui, |ui| {
            ui.set_width(TOAST_WIDTH);
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(toast.level.icon()).color(text).strong());
                ui.label(RichText::new(&toast.message).color(text));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_errors_collapse() {
        let mut toasts = ToastManager::default();
        toasts.error("Could not save \"Standup\"");
        toasts.error("Could not save \"Standup\"");
        toasts.info("Calendar is read-only");
        assert_eq!(toasts.toasts.len(), 2);
    }

    #[test]
    fn test_fresh_toast_is_opaque() {
        let toast = Toast::new("Saved", ToastLevel::Info);
        assert!(!toast.is_expired());
        assert_eq!(toast.opacity(), 1.0);
    }

    #[test]
    fn test_faded_toast_loses_alpha() {
        let (fill, text) = toast_colors(ToastLevel::Error, true, 1.0);
        assert!(fill.a() > 220 && fill.a() < 240);
        assert_eq!(text, ToastLevel::Error.text_color(true));

        let (fill, _) = toast_colors(ToastLevel::Error, true, 0.0);
        assert_eq!(fill.a(), 0);
    }
}
