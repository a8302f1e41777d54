mod app;
mod calendar;
mod cli;
mod components;
mod config;
mod event;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, ViewMode};
use chrono::Local;
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use event::Action;
use ratatui::layout::{Constraint, Layout, Rect};

use calendar::{EventSource, Store};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;
    cli::init_tracing(cli.verbose, cli.quiet, &config.log_path())?;

    let source = cli
        .source
        .clone()
        .or_else(|| config.source.clone())
        .ok_or_else(|| {
            eyre!(
                "No event source configured. Pass --source or set `source` in {}",
                config::default_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config.toml".to_string())
            )
        })?;
    let source = EventSource::parse(&source, config.token.clone());
    tracing::info!(source = %source.describe(), "starting");

    let today = Local::now().date_naive();
    let store = Store::new(source)?;
    let theme = config.theme.to_theme();
    tracing::debug!(theme = %theme.name, "theme loaded");
    let mut app = App::new(store, theme, today, cli.date.unwrap_or(today));

    eprintln!("Loading events...");
    app.refresh_events().await;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| draw(frame, app))?;

        let Some(key) = event::next_key_event(Duration::from_millis(100))? else {
            continue;
        };
        let Some(action) = event::map_key(app.view_mode, key) else {
            continue;
        };

        // Clear status message on any handled key
        app.status_message = None;

        // Help and detail overlays take priority
        if app.handle_overlay(action) {
            continue;
        }

        handle_action(app, action).await;
    }

    Ok(())
}

async fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.running = false,
        Action::SwitchView(mode) => app.view_mode = mode,
        Action::Today => app.go_to_today(),
        Action::Refresh => app.refresh_events().await,
        Action::PrevDay => app.prev_day(),
        Action::NextDay => app.next_day(),
        Action::PrevWeek => app.prev_week(),
        Action::NextWeek => app.next_week(),
        Action::PrevMonth => app.prev_month(),
        Action::NextMonth => app.next_month(),
        Action::CursorUp => app.cursor_up(),
        Action::CursorDown => app.cursor_down(),
        Action::OpenDetail => app.open_detail(),
        Action::ToggleHelp => app.show_help = true,
        Action::Close => {}
    }
}

fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    // Main layout: content + status bar
    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let content_area = layout[0];

    match app.view_mode {
        ViewMode::Month => render_month_layout(frame, content_area, app),
        ViewMode::Week => components::WeekView::render(
            frame,
            content_area,
            app.selected_date,
            app.today,
            app.week_start(),
            &app.index,
            &app.theme,
        ),
        ViewMode::Day => render_day(frame, content_area, app),
    }

    if app.show_detail {
        if let Some(ev) = app.selected_event() {
            components::day_view::render_detail_popup(frame, area, ev, &app.theme);
        }
    }

    if app.show_help {
        render_help(frame, area, app);
    }

    components::StatusBar::render(frame, layout[1], app);
}

fn render_day(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    components::DayView::render(
        frame,
        area,
        app.selected_date,
        app.day_events(),
        app.day_cursor,
        &app.theme,
    );
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let total_width = area.width;
    if total_width < 60 {
        components::MonthView::render(
            frame,
            area,
            app.selected_date,
            app.today,
            &app.index,
            &app.theme,
        );
        return;
    }

    let content = Layout::horizontal([Constraint::Length(44), Constraint::Min(20)]).split(area);

    components::MonthView::render(
        frame,
        content[0],
        app.selected_date,
        app.today,
        &app.index,
        &app.theme,
    );
    render_day(frame, content[1], app);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.clamp(30, 52).min(area.width);
    let popup_h = area.height.clamp(12, 28).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let dim = app.theme.dim;

    let binding = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        binding("h/l", "Previous/next day"),
        binding("j/k", "Select event (week view: week)"),
        binding("J/K", "Next/previous week"),
        binding("[/]", "Previous/next month"),
        binding("t", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        binding("1/2/3", "Month / Week / Day view"),
        Line::from(""),
        Line::from(Span::styled("Actions", section_style)),
        binding("Enter", "Event details"),
        binding("r", "Refresh events"),
        binding("Esc", "Close popup"),
        binding("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("Event types", section_style)),
    ];

    lines.extend(calendar::EventKind::ALL.iter().map(|kind| {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{} ", kind.icon()),
                Style::default().fg(Color::Black).bg(app.theme.kind_color(*kind)),
            ),
            Span::styled(format!(" {}", kind.label()), dim),
        ])
    }));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
