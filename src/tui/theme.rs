use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::theme::ThemePreference;

/// Parsed color palette for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub tag: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            tag: Color::Rgb(0x44, 0xDD, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFA, 0xF8, 0xFF),
            text: Color::Rgb(0x3A, 0x34, 0x5C),
            text_bright: Color::Rgb(0x0C, 0x00, 0x1B),
            highlight: Color::Rgb(0xC2, 0x18, 0x6B),
            dim: Color::Rgb(0x8A, 0x85, 0xA8),
            red: Color::Rgb(0xC6, 0x28, 0x28),
            yellow: Color::Rgb(0xB2, 0x8C, 0x00),
            green: Color::Rgb(0x2E, 0x7D, 0x32),
            tag: Color::Rgb(0x1E, 0x6F, 0xA8),
            selection_bg: Color::Rgb(0xEC, 0xE4, 0xFA),
            search_match_bg: Color::Rgb(0xFF, 0xE0, 0x82),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }

    /// Base palette for the preference, then `[ui.colors]` overrides on top.
    pub fn from_config(pref: ThemePreference, ui: &UiConfig) -> Self {
        let mut theme = match pref {
            ThemePreference::Light => Theme::light(),
            ThemePreference::Dark => Theme::dark(),
        };
        theme.apply_overrides(&ui.colors);
        theme
    }

    fn apply_overrides(&mut self, colors: &HashMap<String, String>) {
        for (key, value) in colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::debug!(%key, %value, "ignoring unparsable color");
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut self.background,
                "text" => &mut self.text,
                "text_bright" => &mut self.text_bright,
                "highlight" => &mut self.highlight,
                "dim" => &mut self.dim,
                "red" => &mut self.red,
                "yellow" => &mut self.yellow,
                "green" => &mut self.green,
                "tag" => &mut self.tag,
                "selection_bg" => &mut self.selection_bg,
                "search_match_bg" => &mut self.search_match_bg,
                "search_match_fg" => &mut self.search_match_fg,
                _ => continue,
            };
            *slot = color;
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
