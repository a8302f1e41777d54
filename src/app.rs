use chrono::{Datelike, Days, Local, Months, NaiveDate};

use crate::calendar::{index_events_by_date, CalendarEvent, EventIndex, Store};
use crate::event::Action;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub index: EventIndex,
    pub day_cursor: usize,
    pub show_detail: bool,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub theme: Theme,
    store: Store,
}

impl App {
    pub fn new(store: Store, theme: Theme, today: NaiveDate, selected_date: NaiveDate) -> Self {
        Self {
            running: true,
            view_mode: ViewMode::Month,
            selected_date,
            today,
            index: EventIndex::default(),
            day_cursor: 0,
            show_detail: false,
            show_help: false,
            status_message: None,
            theme,
            store,
        }
    }

    /// Re-fetch the feed. On failure the previous events stay on screen.
    pub async fn refresh_events(&mut self) {
        match self.store.fetch_events().await {
            Ok(parsed) => {
                self.set_events(&parsed.events);
                if self.index.is_empty() {
                    tracing::info!(source = %self.store.source().describe(), "event feed is empty");
                }
                self.status_message = if parsed.skipped > 0 {
                    Some(format!(
                        "Loaded {} events, skipped {} malformed",
                        parsed.events.len(),
                        parsed.skipped
                    ))
                } else {
                    Some(format!("Loaded {} events", parsed.events.len()))
                };
            }
            Err(error) => {
                tracing::error!(
                    source = %self.store.source().describe(),
                    error = %error,
                    "failed to fetch events"
                );
                self.status_message = Some(format!("Fetch failed: {}", error));
            }
        }
    }

    pub fn set_events(&mut self, events: &[CalendarEvent]) {
        self.index = index_events_by_date(events);
        tracing::debug!(events = self.index.len(), "rebuilt event index");
        self.clamp_cursor();
    }

    pub fn day_events(&self) -> &[CalendarEvent] {
        self.index.events_on(self.selected_date)
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.day_events().get(self.day_cursor)
    }

    /// Sunday of the selected week.
    pub fn week_start(&self) -> NaiveDate {
        let offset = self.selected_date.weekday().num_days_from_sunday();
        self.selected_date
            .checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(self.selected_date)
    }

    pub fn next_day(&mut self) {
        self.select(self.selected_date.succ_opt());
    }

    pub fn prev_day(&mut self) {
        self.select(self.selected_date.pred_opt());
    }

    pub fn next_week(&mut self) {
        self.select(self.selected_date.checked_add_days(Days::new(7)));
    }

    pub fn prev_week(&mut self) {
        self.select(self.selected_date.checked_sub_days(Days::new(7)));
    }

    /// Same day next month, clamped to the month's length.
    pub fn next_month(&mut self) {
        self.select(self.selected_date.checked_add_months(Months::new(1)));
    }

    pub fn prev_month(&mut self) {
        self.select(self.selected_date.checked_sub_months(Months::new(1)));
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.select(Some(self.today));
    }

    pub fn cursor_down(&mut self) {
        let count = self.day_events().len();
        if self.day_cursor + 1 < count {
            self.day_cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.day_cursor = self.day_cursor.saturating_sub(1);
    }

    pub fn open_detail(&mut self) {
        if self.selected_event().is_some() {
            self.show_detail = true;
        } else {
            self.status_message = Some("No event selected".to_string());
        }
    }

    pub fn close_detail(&mut self) {
        self.show_detail = false;
    }

    /// Keys while the help or detail overlay is up. Returns `false` when no
    /// overlay is open and the action should go to the normal handler.
    pub fn handle_overlay(&mut self, action: Action) -> bool {
        if !self.show_help && !self.show_detail {
            return false;
        }
        match action {
            Action::Quit => self.running = false,
            Action::Close | Action::ToggleHelp if self.show_help => self.show_help = false,
            Action::Close | Action::OpenDetail if self.show_detail => self.close_detail(),
            _ => {}
        }
        true
    }

    fn select(&mut self, date: Option<NaiveDate>) {
        let Some(date) = date else {
            return;
        };
        if date == self.selected_date {
            return;
        }
        self.selected_date = date;
        self.day_cursor = 0;
        tracing::trace!(%date, events = self.day_events().len(), "selected date");
    }

    fn clamp_cursor(&mut self) {
        let count = self.day_events().len();
        if self.day_cursor >= count {
            self.day_cursor = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{EventKind, EventSource};
    use chrono::NaiveTime;
    use std::path::PathBuf;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app_at(date: NaiveDate, path: PathBuf) -> App {
        let store = Store::new(EventSource::File { path }).unwrap();
        App::new(store, Theme::default(), date, date)
    }

    fn event(id: &str, date: NaiveDate, hour: u32) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: id.to_string(),
            date,
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: None,
            kind: EventKind::Meeting,
            location: None,
            notes: None,
            team: None,
        }
    }

    #[test]
    fn month_navigation_clamps_day() {
        let mut app = app_at(ymd(2025, 1, 31), PathBuf::from("unused.json"));
        app.next_month();
        assert_eq!(app.selected_date, ymd(2025, 2, 28));

        let mut app = app_at(ymd(2024, 3, 31), PathBuf::from("unused.json"));
        app.prev_month();
        assert_eq!(app.selected_date, ymd(2024, 2, 29));

        let mut app = app_at(ymd(2025, 12, 15), PathBuf::from("unused.json"));
        app.next_month();
        assert_eq!(app.selected_date, ymd(2026, 1, 15));
    }

    #[test]
    fn day_and_week_navigation() {
        let mut app = app_at(ymd(2025, 2, 28), PathBuf::from("unused.json"));
        app.next_day();
        assert_eq!(app.selected_date, ymd(2025, 3, 1));
        app.prev_week();
        assert_eq!(app.selected_date, ymd(2025, 2, 22));
        app.next_week();
        app.prev_day();
        assert_eq!(app.selected_date, ymd(2025, 2, 28));
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2025-03-12 is a Wednesday
        let app = app_at(ymd(2025, 3, 12), PathBuf::from("unused.json"));
        assert_eq!(app.week_start(), ymd(2025, 3, 9));
        let app = app_at(ymd(2025, 3, 9), PathBuf::from("unused.json"));
        assert_eq!(app.week_start(), ymd(2025, 3, 9));
    }

    #[test]
    fn cursor_stays_within_day_events() {
        let day = ymd(2025, 3, 10);
        let mut app = app_at(day, PathBuf::from("unused.json"));
        app.set_events(&[event("b", day, 14), event("a", day, 9), event("c", ymd(2025, 3, 11), 8)]);

        assert_eq!(app.selected_event().map(|e| e.id.as_str()), Some("a"));
        app.cursor_down();
        app.cursor_down();
        assert_eq!(app.day_cursor, 1);
        assert_eq!(app.selected_event().map(|e| e.id.as_str()), Some("b"));

        app.next_day();
        assert_eq!(app.day_cursor, 0);
        assert_eq!(app.selected_event().map(|e| e.id.as_str()), Some("c"));
        app.cursor_up();
        assert_eq!(app.day_cursor, 0);
    }

    #[test]
    fn detail_requires_an_event() {
        let day = ymd(2025, 3, 10);
        let mut app = app_at(day, PathBuf::from("unused.json"));
        app.open_detail();
        assert!(!app.show_detail);
        assert!(app.status_message.is_some());

        app.set_events(&[event("a", day, 9)]);
        app.open_detail();
        assert!(app.show_detail);
        app.close_detail();
        assert!(!app.show_detail);
    }

    #[test]
    fn overlays_close_on_esc_and_quit_on_q() {
        let day = ymd(2025, 3, 10);
        let mut app = app_at(day, PathBuf::from("unused.json"));
        assert!(!app.handle_overlay(Action::Close));

        app.set_events(&[event("a", day, 9)]);
        app.open_detail();
        app.show_help = true;
        assert!(app.handle_overlay(Action::NextDay));
        assert_eq!(app.selected_date, day);

        assert!(app.handle_overlay(Action::Close));
        assert!(!app.show_help);
        assert!(app.show_detail);
        assert!(app.handle_overlay(Action::Close));
        assert!(!app.show_detail);

        app.show_help = true;
        assert!(app.handle_overlay(Action::Quit));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn empty_feed_is_a_normal_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "[]").unwrap();

        let mut app = app_at(ymd(2025, 2, 1), path);
        app.refresh_events().await;
        assert!(app.index.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Loaded 0 events"));
    }

    #[tokio::test]
    async fn refresh_loads_feed_and_keeps_events_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"[{"id": "1", "title": "Training", "type": "training", "date": "2025-02-01", "startTime": "10:00"},
                {"id": "2", "title": "Game", "type": "match", "date": "2025-02-15", "startTime": "08:00"},
                {"id": "3", "title": "Bad", "date": "2025-02-31", "startTime": "08:00"}]"#,
        )
        .unwrap();

        let mut app = app_at(ymd(2025, 2, 1), path.clone());
        app.refresh_events().await;
        assert_eq!(app.index.len(), 2);
        assert_eq!(app.day_events().len(), 1);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Loaded 2 events, skipped 1 malformed")
        );

        std::fs::remove_file(&path).unwrap();
        app.refresh_events().await;
        assert_eq!(app.index.len(), 2);
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Fetch failed")));
    }
}
