use ratatui::style::Color;

use crate::model::UiConfig;
use crate::ops::present::StatusCategory;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub selection_bg: Color,
    pub error: Color,
    /// Pending, High priority
    pub urgent: Color,
    /// Pending, Medium priority
    pub normal: Color,
    /// Pending, Low priority
    pub low: Color,
    /// Completed
    pub done: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x12, 0x12, 0x18),
            text: Color::Rgb(0xD0, 0xD0, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x21, 0x96, 0xF3),
            dim: Color::Rgb(0x80, 0x80, 0x88),
            selection_bg: Color::Rgb(0x2A, 0x2E, 0x3C),
            error: Color::Rgb(0xF4, 0x43, 0x36),
            urgent: Color::Rgb(0xFF, 0x44, 0x44),
            normal: Color::Rgb(0xFF, 0xA5, 0x00),
            low: Color::Rgb(0x44, 0xCC, 0x66),
            done: Color::Rgb(0x80, 0x80, 0x80),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults.
    /// Unknown keys and unparseable values are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "selection_bg" => &mut theme.selection_bg,
                "error" => &mut theme.error,
                "urgent" => &mut theme.urgent,
                "normal" => &mut theme.normal,
                "low" => &mut theme.low,
                "done" => &mut theme.done,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }

    /// Color for a task's status category
    pub fn category_color(&self, category: StatusCategory) -> Color {
        match category {
            StatusCategory::Done => self.done,
            StatusCategory::UrgentPending => self.urgent,
            StatusCategory::NormalPending => self.normal,
            StatusCategory::LowPending => self.low,
        }
    }
}
