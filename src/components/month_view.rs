use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{build_month_grid, DayCell, EventIndex};
use crate::theme::Theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL_WIDTH: usize = 6;

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        index: &EventIndex,
        theme: &Theme,
    ) {
        let title = format!(
            " {} {} ",
            month_name(selected_date.month()),
            selected_date.year()
        );

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header_cells: Vec<Span> = DAY_NAMES
            .iter()
            .map(|d| Span::styled(format!("{:^width$}", d, width = CELL_WIDTH), theme.header))
            .collect();
        let header = Line::from(header_cells);

        let grid = build_month_grid(selected_date);
        let weeks: Vec<Line> = grid
            .chunks(7)
            .map(|week| {
                Line::from(
                    week.iter()
                        .map(|cell| render_cell(*cell, selected_date, today, index, theme))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        let mut constraints = vec![Constraint::Length(1)]; // header
        for _ in &weeks {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(0));

        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

fn render_cell(
    cell: Option<DayCell>,
    selected_date: NaiveDate,
    today: NaiveDate,
    index: &EventIndex,
    theme: &Theme,
) -> Span<'static> {
    let Some(DayCell { date }) = cell else {
        return Span::raw(" ".repeat(CELL_WIDTH));
    };

    let events = index.events_on(date);
    let marker = match events {
        [] => "  ".to_string(),
        [only] => format!("{} ", only.kind.icon()),
        [first, rest @ ..] if rest.len() < 9 => format!("{}{}", first.kind.icon(), rest.len() + 1),
        [first, ..] => format!("{}+", first.kind.icon()),
    };

    let style = if date == today && date == selected_date {
        theme.today_selected()
    } else if date == selected_date {
        theme.selected
    } else if date == today {
        theme.today
    } else if let Some(first) = events.first() {
        Style::default().fg(theme.kind_color(first.kind))
    } else {
        Style::default()
    };

    Span::styled(format!(" {:>2}{} ", date.day(), marker), style)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{index_events_by_date, CalendarEvent, EventKind};
    use chrono::NaiveTime;
    use ratatui::{backend::TestBackend, Terminal};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(date: NaiveDate, kind: EventKind) -> CalendarEvent {
        CalendarEvent {
            id: date.to_string(),
            title: "x".to_string(),
            date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: None,
            kind,
            location: None,
            notes: None,
            team: None,
        }
    }

    /// Text of row `y` without the side borders.
    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (1..buffer.area.width - 1)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn cell_shows_icon_and_count() {
        let day = ymd(2025, 2, 15);
        let events = vec![event(day, EventKind::Match), event(day, EventKind::Meal)];
        let index = index_events_by_date(&events);
        let theme = Theme::default();

        let span = render_cell(Some(DayCell { date: day }), ymd(2025, 2, 1), ymd(2025, 1, 1), &index, &theme);
        assert_eq!(span.content, " 15M2 ");

        let span = render_cell(None, day, day, &index, &theme);
        assert_eq!(span.content, "      ");
    }

    #[test]
    fn renders_february_2025_with_saturday_start() {
        let backend = TestBackend::new(44, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let selected = ymd(2025, 2, 1);
        let events = vec![event(selected, EventKind::Training)];
        let index = index_events_by_date(&events);
        let theme = Theme::default();

        terminal
            .draw(|frame| {
                let area = frame.area();
                MonthView::render(frame, area, selected, ymd(2025, 3, 1), &index, &theme)
            })
            .unwrap();

        assert!(row_text(&terminal, 0).contains("February 2025"));
        assert!(row_text(&terminal, 1).contains("Sun"));
        // six padding cells, then day 1 under Saturday
        let first_week = row_text(&terminal, 2);
        assert!(first_week.trim_end().ends_with("1T"));
        assert!(row_text(&terminal, 3).contains(" 2 "));
        // 34 cells make five rows; the last holds 23..28
        assert!(row_text(&terminal, 6).contains("28"));
        assert!(!row_text(&terminal, 7).contains("29"));
    }
}
