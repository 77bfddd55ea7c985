//! Display colours derived from a calendar colour.
//!
//! Settled events get a translucent fill with darkened text; a draft being
//! edited gets an opaque fill with white text so it stands out.

use egui::Color32;

/// Alpha of the standard (settled) background.
pub const STANDARD_BACKGROUND_ALPHA: f32 = 0.3;
/// Factor applied to HSB brightness for standard text.
pub const STANDARD_TEXT_BRIGHTNESS: f32 = 0.4;

/// Hue, saturation, brightness and alpha, each in `0.0..=1.0`, in sRGB space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub alpha: f32,
}

impl From<Color32> for Hsb {
    fn from(color: Color32) -> Self {
        let [r, g, b, a] = color.to_srgba_unmultiplied().map(|c| c as f32 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            ((g - b) / delta).rem_euclid(6.0) / 6.0
        } else if max == g {
            ((b - r) / delta + 2.0) / 6.0
        } else {
            ((r - g) / delta + 4.0) / 6.0
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };

        Self {
            hue,
            saturation,
            brightness: max,
            alpha: a,
        }
    }
}

impl From<Hsb> for Color32 {
    fn from(hsb: Hsb) -> Self {
        let h = hsb.hue.rem_euclid(1.0) * 6.0;
        let s = hsb.saturation.clamp(0.0, 1.0);
        let v = hsb.brightness.clamp(0.0, 1.0);

        let chroma = v * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = v - chroma;

        Color32::from_rgba_unmultiplied(
            to_channel(r + m),
            to_channel(g + m),
            to_channel(b + m),
            to_channel(hsb.alpha),
        )
    }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, to_channel(alpha))
}

/// Background and text colour for one event block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventColors {
    pub background: Color32,
    pub text: Color32,
}

impl EventColors {
    pub fn standard(calendar_color: Color32) -> Self {
        let mut text = Hsb::from(calendar_color);
        text.brightness *= STANDARD_TEXT_BRIGHTNESS;

        Self {
            background: with_alpha(calendar_color, STANDARD_BACKGROUND_ALPHA),
            text: text.into(),
        }
    }

    pub fn editing(calendar_color: Color32) -> Self {
        Self {
            background: with_alpha(calendar_color, 1.0),
            text: Color32::WHITE,
        }
    }
}
