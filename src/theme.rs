use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::calendar::EventKind;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    kinds: [Color; 8],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            kinds: default_kind_colors(),
        }
    }
}

fn default_kind_colors() -> [Color; 8] {
    EventKind::ALL.map(|kind| match kind {
        EventKind::Training => Color::Green,
        EventKind::Match => Color::Red,
        EventKind::Meeting => Color::Blue,
        EventKind::Medical => Color::Magenta,
        EventKind::Recovery => Color::Cyan,
        EventKind::Meal => Color::Yellow,
        EventKind::Rest => Color::Gray,
        EventKind::Other => Color::White,
    })
}

fn kind_slot(kind: EventKind) -> usize {
    EventKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(EventKind::ALL.len() - 1)
}

impl Theme {
    /// Colour swatch for an event category.
    pub fn kind_color(&self, kind: EventKind) -> Color {
        self.kinds[kind_slot(kind)]
    }

    /// Style used where today and the selection coincide.
    pub fn today_selected(&self) -> Style {
        self.today.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)),
            header: Style::default().fg(Color::Rgb(248, 248, 242)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(Color::Rgb(68, 71, 90)),
            status: Style::default()
                .fg(Color::Rgb(248, 248, 242))
                .bg(Color::Rgb(68, 71, 90)),
            highlight: Style::default()
                .bg(Color::Rgb(68, 71, 90))
                .add_modifier(Modifier::BOLD),
            kinds: [
                Color::Rgb(80, 250, 123),
                Color::Rgb(255, 85, 85),
                Color::Rgb(139, 233, 253),
                Color::Rgb(255, 121, 198),
                Color::Rgb(189, 147, 249),
                Color::Rgb(241, 250, 140),
                Color::Rgb(98, 114, 164),
                Color::Rgb(248, 248, 242),
            ],
        }
    }

    fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(250, 189, 47)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)),
            header: Style::default().fg(Color::Rgb(235, 219, 178)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            status: Style::default()
                .fg(Color::Rgb(235, 219, 178))
                .bg(Color::Rgb(80, 73, 69)),
            highlight: Style::default()
                .bg(Color::Rgb(80, 73, 69))
                .add_modifier(Modifier::BOLD),
            kinds: [
                Color::Rgb(184, 187, 38),
                Color::Rgb(251, 73, 52),
                Color::Rgb(131, 165, 152),
                Color::Rgb(211, 134, 155),
                Color::Rgb(142, 192, 124),
                Color::Rgb(250, 189, 47),
                Color::Rgb(146, 131, 116),
                Color::Rgb(235, 219, 178),
            ],
        }
    }

    fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)),
            header: Style::default().fg(Color::Rgb(229, 233, 240)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            status: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .bg(Color::Rgb(67, 76, 94)),
            highlight: Style::default()
                .bg(Color::Rgb(67, 76, 94))
                .add_modifier(Modifier::BOLD),
            kinds: [
                Color::Rgb(163, 190, 140),
                Color::Rgb(191, 97, 106),
                Color::Rgb(129, 161, 193),
                Color::Rgb(180, 142, 173),
                Color::Rgb(143, 188, 187),
                Color::Rgb(235, 203, 139),
                Color::Rgb(76, 86, 106),
                Color::Rgb(229, 233, 240),
            ],
        }
    }
}

/// `[theme]` table of the config file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub today_fg: Option<String>,
    pub today_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub highlight_bg: Option<String>,
    pub kinds: HashMap<String, String>,
}

impl ThemeConfig {
    pub fn to_theme(&self) -> Theme {
        // Start from preset or default
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let color = |value: &Option<String>| value.as_deref().and_then(parse_color);

        if let Some(c) = color(&self.today_fg) {
            theme.today = theme.today.fg(c);
        }
        if let Some(c) = color(&self.today_bg) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = color(&self.selected_fg) {
            theme.selected = theme.selected.fg(c);
        }
        if let Some(c) = color(&self.selected_bg) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = color(&self.header_fg) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = color(&self.dim_fg) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = color(&self.border_fg) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = color(&self.status_fg) {
            theme.status = theme.status.fg(c);
        }
        if let Some(c) = color(&self.status_bg) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = color(&self.highlight_bg) {
            theme.highlight = theme.highlight.bg(c);
        }

        for kind in EventKind::ALL {
            match self.kinds.get(kind.config_key()).map(|s| parse_color(s)) {
                Some(Some(c)) => theme.kinds[kind_slot(kind)] = c,
                Some(None) => tracing::warn!(kind = kind.config_key(), "ignoring unknown colour"),
                None => {}
            }
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(s.get(1..3)?, 16).ok()?;
        let g = u8::from_str_radix(s.get(3..5)?, 16).ok()?;
        let b = u8::from_str_radix(s.get(5..7)?, 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color(" DarkGrey "), Some(Color::DarkGray));
        assert_eq!(parse_color("#ff80"), None);
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn multibyte_hex_is_rejected_not_sliced() {
        // seven bytes, but the slices would split 'é'
        assert_eq!(parse_color("#aééb"), None);
        let config = ThemeConfig {
            today_bg: Some("#aééb".to_string()),
            ..ThemeConfig::default()
        };
        assert_eq!(config.to_theme().today, Theme::default().today);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let config: ThemeConfig = toml::from_str(
            r##"
            preset = "nord"
            today_bg = "red"

            [kinds]
            match = "#010203"
            rest = "nope"
            "##,
        )
        .unwrap();
        let theme = config.to_theme();
        assert_eq!(theme.name, "nord");
        assert_eq!(theme.today.bg, Some(Color::Red));
        assert_eq!(theme.kind_color(EventKind::Match), Color::Rgb(1, 2, 3));
        assert_eq!(theme.kind_color(EventKind::Rest), Theme::preset("nord").kind_color(EventKind::Rest));
    }

    #[test]
    fn unknown_preset_falls_back_to_default() {
        let theme = Theme::preset("solarized");
        assert_eq!(theme.name, "default");
        assert_eq!(theme.kind_color(EventKind::Training), Color::Green);
    }
}
