use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    SwitchView(ViewMode),
    Today,
    Refresh,
    PrevDay,
    NextDay,
    PrevWeek,
    NextWeek,
    PrevMonth,
    NextMonth,
    CursorUp,
    CursorDown,
    OpenDetail,
    ToggleHelp,
    Close,
}

pub fn poll_event(timeout: Duration) -> color_eyre::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn next_key_event(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    loop {
        match poll_event(timeout)? {
            Some(Event::Key(key)) if key.kind != KeyEventKind::Release => return Ok(Some(key)),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}

/// Translate a key press into an action. Vertical keys walk the day list in
/// month and day view and move by week in week view.
pub fn map_key(mode: ViewMode, key: KeyEvent) -> Option<Action> {
    let action = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('q'), _) => Action::Quit,
        (KeyCode::Char('1'), _) => Action::SwitchView(ViewMode::Month),
        (KeyCode::Char('2'), _) => Action::SwitchView(ViewMode::Week),
        (KeyCode::Char('3'), _) => Action::SwitchView(ViewMode::Day),
        (KeyCode::Char('t'), _) => Action::Today,
        (KeyCode::Char('r'), _) => Action::Refresh,
        (KeyCode::Enter, _) => Action::OpenDetail,
        (KeyCode::Char('?'), _) => Action::ToggleHelp,
        (KeyCode::Esc, _) => Action::Close,
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Action::PrevDay,
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Action::NextDay,
        (KeyCode::Char('K'), _) => Action::PrevWeek,
        (KeyCode::Char('J'), _) => Action::NextWeek,
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => match mode {
            ViewMode::Week => Action::PrevWeek,
            _ => Action::CursorUp,
        },
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => match mode {
            ViewMode::Week => Action::NextWeek,
            _ => Action::CursorDown,
        },
        (KeyCode::Char('['), _) => Action::PrevMonth,
        (KeyCode::Char(']'), _) => Action::NextMonth,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn vertical_keys_depend_on_view() {
        assert_eq!(map_key(ViewMode::Month, key(KeyCode::Char('j'))), Some(Action::CursorDown));
        assert_eq!(map_key(ViewMode::Day, key(KeyCode::Up)), Some(Action::CursorUp));
        assert_eq!(map_key(ViewMode::Week, key(KeyCode::Char('j'))), Some(Action::NextWeek));
        assert_eq!(map_key(ViewMode::Week, key(KeyCode::Up)), Some(Action::PrevWeek));
    }

    #[test]
    fn global_bindings() {
        assert_eq!(
            map_key(ViewMode::Day, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(map_key(ViewMode::Day, key(KeyCode::Char('c'))), None);
        assert_eq!(map_key(ViewMode::Month, key(KeyCode::Char(']'))), Some(Action::NextMonth));
        assert_eq!(
            map_key(ViewMode::Month, key(KeyCode::Char('2'))),
            Some(Action::SwitchView(ViewMode::Week))
        );
        assert_eq!(map_key(ViewMode::Month, key(KeyCode::Char('x'))), None);
    }
}
