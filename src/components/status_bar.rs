use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ViewMode};

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let w = area.width as usize;
        let style = app.theme.status;

        let mode_str = match app.view_mode {
            ViewMode::Month => "[1]Month",
            ViewMode::Week => "[2]Week",
            ViewMode::Day => "[3]Day",
        };

        let right_text = match app.status_message {
            Some(ref msg) => format!(" {} ", msg),
            None => hints(app.view_mode, w).to_string(),
        };

        let left = format!(" {} ", mode_str);
        let padding = " ".repeat(w.saturating_sub(left.len() + right_text.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right_text, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}

fn hints(mode: ViewMode, w: usize) -> &'static str {
    match mode {
        ViewMode::Day | ViewMode::Month if w >= 80 => {
            " hjkl:Nav [/]:Mon t:Today Enter:Detail r:Refresh ?:Help q:Quit"
        }
        ViewMode::Day | ViewMode::Month if w >= 50 => " jk:Select Enter:Detail r:Refresh q:Quit",
        ViewMode::Week if w >= 70 => " hl:Day jk:Week [/]:Mon t:Today ?:Help q:Quit",
        ViewMode::Week if w >= 50 => " arrows:Nav r:Refresh q:Quit",
        _ => " ?:Help q:Quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_shrink_with_width() {
        assert!(hints(ViewMode::Month, 100).contains("Enter:Detail"));
        assert!(hints(ViewMode::Week, 60).starts_with(" arrows"));
        assert_eq!(hints(ViewMode::Day, 20), " ?:Help q:Quit");
    }
}
