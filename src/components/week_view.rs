use chrono::{NaiveDate, Timelike};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{CalendarEvent, EventIndex};
use crate::theme::Theme;

const HOUR_START: u32 = 6;
const HOUR_END: u32 = 23;

pub struct WeekView;

impl WeekView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        week_start: NaiveDate,
        index: &EventIndex,
        theme: &Theme,
    ) {
        let block = Block::default()
            .title(format!(" Week of {} ", week_start.format("%b %d, %Y")))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 10 || inner.height < 3 {
            return;
        }

        let inner_w = inner.width as usize;
        let inner_h = inner.height as usize;

        // Time label column width
        let time_col_w: u16 = if inner_w >= 70 { 6 } else { 4 };
        let day_cols_w = inner.width.saturating_sub(time_col_w);
        let col_w = (day_cols_w / 7).max(1);

        let mut col_constraints = vec![Constraint::Length(time_col_w)];
        for _ in 0..7 {
            col_constraints.push(Constraint::Length(col_w));
        }
        col_constraints.push(Constraint::Min(0));

        let cols = Layout::horizontal(col_constraints).split(inner);

        // Reserve 1 row for day headers
        let content_rows = inner_h.saturating_sub(1);
        let total_hours = (HOUR_END - HOUR_START) as usize;
        let rows_per_hour = (content_rows / total_hours).max(1);
        let visible_hours = (content_rows / rows_per_hour).min(total_hours);

        let mut row_constraints = vec![Constraint::Length(1)];
        for _ in 0..visible_hours {
            row_constraints.push(Constraint::Length(rows_per_hour as u16));
        }
        row_constraints.push(Constraint::Min(0));

        let rows = Layout::vertical(row_constraints).split(inner);

        let days: Vec<NaiveDate> = week_start.iter_days().take(7).collect();

        for (offset, date) in days.iter().enumerate() {
            let col_idx = offset + 1;

            let day_label = if col_w >= 10 {
                date.format("%a %d").to_string()
            } else if col_w >= 5 {
                date.format("%a").to_string()
            } else {
                date.format("%d").to_string()
            };

            let style = if *date == today && *date == selected_date {
                theme.today_selected()
            } else if *date == selected_date {
                theme.selected
            } else if *date == today {
                theme.today
            } else {
                theme.header
            };

            let label = Paragraph::new(Line::from(Span::styled(
                format!("{:^width$}", day_label, width = col_w as usize),
                style,
            )));
            frame.render_widget(label, cols[col_idx].intersection(rows[0]));
        }

        for hour_idx in 0..visible_hours {
            let hour = HOUR_START + hour_idx as u32;
            let row_idx = hour_idx + 1;

            let time_label = if time_col_w >= 6 {
                format!("{:>2}:00 ", hour)
            } else {
                format!("{:>2} ", hour)
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(time_label, theme.dim))),
                cols[0].intersection(rows[row_idx]),
            );

            for (offset, date) in days.iter().enumerate() {
                let cell_area = cols[offset + 1].intersection(rows[row_idx]);
                if cell_area.width == 0 || cell_area.height == 0 {
                    continue;
                }

                let edge = RowEdge {
                    first: hour_idx == 0,
                    last: hour_idx + 1 == visible_hours,
                };
                let Some(ev) = event_in_hour(index.events_on(*date), hour, edge) else {
                    continue;
                };

                let max_title_len = cell_area.width as usize;
                let title: String = ev.title.chars().take(max_title_len).collect();
                let display = format!("{:<width$}", title, width = max_title_len);
                let style = Style::default().fg(Color::Black).bg(theme.kind_color(ev.kind));

                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(display, style))),
                    cell_area,
                );
            }
        }
    }
}

/// Whether an hour row is the first or last one drawn.
#[derive(Debug, Clone, Copy, Default)]
struct RowEdge {
    first: bool,
    last: bool,
}

/// First event occupying `hour`. The top row also shows anything that
/// starts before it and the bottom row anything that starts after it, so
/// no event of the day falls outside the grid.
fn event_in_hour(events: &[CalendarEvent], hour: u32, edge: RowEdge) -> Option<&CalendarEvent> {
    events.iter().find(|ev| {
        let start = ev.start_time.hour();
        ev.overlaps_hour(hour) || (edge.first && start < hour) || (edge.last && start > hour)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventKind;
    use chrono::NaiveTime;
    use ratatui::{backend::TestBackend, Terminal};

    fn event(id: &str, start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0),
            kind: EventKind::Training,
            location: None,
            notes: None,
            team: None,
        }
    }

    #[test]
    fn picks_first_overlapping_event() {
        let events = vec![event("gym", (7, 0), (9, 0)), event("pool", (8, 30), (9, 30))];
        let mid = RowEdge::default();
        assert_eq!(event_in_hour(&events, 8, mid).map(|e| e.id.as_str()), Some("gym"));
        assert_eq!(event_in_hour(&events, 9, mid).map(|e| e.id.as_str()), Some("pool"));
        assert!(event_in_hour(&events, 10, mid).is_none());
    }

    #[test]
    fn early_events_surface_in_top_row() {
        let events = vec![event("run", (5, 0), (5, 45))];
        let top = RowEdge { first: true, last: false };
        assert!(event_in_hour(&events, HOUR_START, RowEdge::default()).is_none());
        assert_eq!(event_in_hour(&events, HOUR_START, top).map(|e| e.id.as_str()), Some("run"));
    }

    #[test]
    fn late_events_surface_in_bottom_row() {
        let events = vec![event("stretch", (23, 15), (23, 45))];
        let bottom = RowEdge { first: false, last: true };
        let last_hour = HOUR_END - 1;
        assert!(event_in_hour(&events, last_hour, RowEdge::default()).is_none());
        assert_eq!(
            event_in_hour(&events, last_hour, bottom).map(|e| e.id.as_str()),
            Some("stretch")
        );
    }

    #[test]
    fn every_event_of_the_day_lands_in_some_row() {
        let events = vec![event("early", (4, 0), (4, 30)), event("late", (23, 15), (23, 45))];
        let index = crate::calendar::index_events_by_date(&events);
        let mut terminal = Terminal::new(TestBackend::new(90, 40)).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                WeekView::render(frame, area, day, day, sunday, &index, &Theme::default())
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("early"));
        assert!(text.contains("late"));
    }
}
