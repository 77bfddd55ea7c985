// Calendar module
// A named calendar owning a display colour

use egui::Color32;

/// Fallback colour for calendars whose stored colour cannot be parsed.
pub const DEFAULT_CALENDAR_COLOR: Color32 = Color32::from_rgb(100, 150, 200);

/// A calendar as known to the store. Every event belongs to exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    pub id: i64,
    pub title: String,
    pub color: Color32,
}

impl Calendar {
    pub fn new(id: i64, title: impl Into<String>, color: Color32) -> Self {
        Self {
            id,
            title: title.into(),
            color,
        }
    }

    /// Colour as `#RRGGBB`, the format used for storage.
    pub fn color_hex(&self) -> String {
        color_to_hex(self.color)
    }
}

/// Payload for inserting a calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendar {
    pub title: String,
    pub color: Color32,
}

impl NewCalendar {
    pub fn new(title: impl Into<String>, color: Color32) -> Self {
        Self {
            title: title.into(),
            color,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Calendar title cannot be empty".to_string());
        }
        Ok(())
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');

    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color32::from_rgb(r, g, b))
    } else if hex.len() == 3 {
        let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
        Some(Color32::from_rgb(r, g, b))
    } else {
        None
    }
}

pub fn color_to_hex(color: Color32) -> String {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_hex() {
        assert_eq!(parse_hex_color("#FF3B30"), Some(Color32::from_rgb(255, 59, 48)));
        assert_eq!(parse_hex_color("007aff"), Some(Color32::from_rgb(0, 122, 255)));
    }

    #[test]
    fn test_parse_three_digit_hex() {
        assert_eq!(parse_hex_color("#F00"), Some(Color32::from_rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_invalid_hex() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_hex_roundtrip_keeps_calendar_color() {
        let calendar = Calendar::new(1, "Work", Color32::from_rgb(0, 122, 255));
        assert_eq!(calendar.color_hex(), "#007AFF");
        assert_eq!(parse_hex_color(&calendar.color_hex()), Some(calendar.color));
    }

    #[test]
    fn test_new_calendar_requires_title() {
        assert!(NewCalendar::new("  ", Color32::RED).validate().is_err());
        assert!(NewCalendar::new("Home", Color32::RED).validate().is_ok());
    }
}
