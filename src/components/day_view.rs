use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::calendar::CalendarEvent;
use crate::theme::Theme;

pub struct DayView;

impl DayView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        events: &[CalendarEvent],
        cursor: usize,
        theme: &Theme,
    ) {
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count_str = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {} events ", n),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No events").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let scroll = scroll_offset(cursor, area.height.saturating_sub(2) as usize);

        let items: Vec<ListItem> = events
            .iter()
            .enumerate()
            .skip(scroll)
            .map(|(i, ev)| {
                let item = format_event(ev, inner_w, theme);
                if i == cursor {
                    item.style(theme.highlight)
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}

/// First list row to draw so the cursor stays inside `visible` rows.
fn scroll_offset(cursor: usize, visible: usize) -> usize {
    cursor.saturating_sub(visible.saturating_sub(1))
}

fn format_event(ev: &CalendarEvent, max_width: usize, theme: &Theme) -> ListItem<'static> {
    let kind_indicator = Span::styled(
        format!("{} ", ev.kind.icon()),
        Style::default().bg(theme.kind_color(ev.kind)).fg(ratatui::style::Color::Black),
    );

    let time_str = format!(" {} ", ev.time_range_display());
    let time_span = Span::styled(
        time_str.clone(),
        Style::default().add_modifier(Modifier::DIM),
    );

    let title_span = Span::styled(ev.title.clone(), Style::default());

    let mut spans = vec![kind_indicator, time_span, title_span];

    // Only show location if there's room
    let used = 2 + time_str.len() + ev.title.chars().count();
    if let Some(ref loc) = ev.location {
        if used + 3 + loc.chars().count() <= max_width {
            spans.push(Span::styled(format!(" @ {}", loc), theme.dim));
        }
    }

    ListItem::new(Line::from(spans))
}

/// Render an event detail popup overlay.
pub fn render_detail_popup(frame: &mut Frame, area: Rect, ev: &CalendarEvent, theme: &Theme) {
    let popup_w = area.width.clamp(30, 60).min(area.width);
    let popup_h = area.height.clamp(8, 16).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let accent = theme.kind_color(ev.kind);
    let block = Block::default()
        .title(format!(" {} ", ev.title))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("  ", Style::default().bg(accent)),
        Span::styled(format!(" {}", ev.kind.label()), Style::default()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Date: ", theme.dim),
        Span::styled(ev.date.format("%A, %B %d, %Y").to_string(), Style::default()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Time: ", theme.dim),
        Span::styled(ev.time_range_display(), Style::default()),
    ]));

    if let Some(ref team) = ev.team {
        lines.push(Line::from(vec![
            Span::styled("Team: ", theme.dim),
            Span::styled(team.clone(), Style::default()),
        ]));
    }

    if let Some(ref loc) = ev.location {
        lines.push(Line::from(vec![
            Span::styled("Location: ", theme.dim),
            Span::styled(loc.clone(), Style::default()),
        ]));
    }

    if let Some(ref notes) = ev.notes {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Notes:", theme.dim)));
        for line in notes.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("ID {}  \u{00b7}  Press Esc to close", ev.id),
        theme.dim,
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
