use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, Step};
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || loop {
        if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
            match event::read() {
                Ok(CtEvent::Key(k)) => {
                    if k.kind == KeyEventKind::Press
                        && tx.blocking_send(Event::Input(InputEvent::Key(k))).is_err()
                    {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.blocking_send(Event::Input(InputEvent::Resize)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => {}
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    let InputEvent::Key(k) = ev else {
        return Some(Action::Resize);
    };

    // Theme toggle works everywhere, including while typing.
    if k.code == KeyCode::Char('t') && k.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::ToggleTheme);
    }

    match state.step {
        Step::Search => handle_search(k),
        Step::Results => handle_results(k),
        Step::LyricPick => handle_lyric_pick(k),
        Step::Preview => handle_preview(k),
    }
}

/// The search step is a text field: printable keys type into the query.
fn handle_search(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::StartSearch),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ClearQuery)
        }
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char(c) => Some(Action::InputChar(c)),
        _ => None,
    }
}

fn handle_results(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
            Some(Action::Back)
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Some(Action::SelectSong),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
        KeyCode::Char('g') => Some(Action::GoTop),
        KeyCode::Char('G') => Some(Action::GoBottom),
        _ => None,
    }
}

fn handle_lyric_pick(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
            Some(Action::Back)
        }
        KeyCode::Char(' ') => Some(Action::ToggleLine),
        KeyCode::Enter => Some(Action::Proceed),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
        KeyCode::Char('g') => Some(Action::GoTop),
        KeyCode::Char('G') => Some(Action::GoBottom),
        KeyCode::Char('v') => Some(Action::ToggleVariant),
        _ => None,
    }
}

fn handle_preview(k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
            Some(Action::Back)
        }
        KeyCode::Char('f') => Some(Action::FetchCover),
        KeyCode::Char('c') => Some(Action::CycleColor),
        KeyCode::Char('t') => Some(Action::ToggleTextMode),
        KeyCode::Char('a') => Some(Action::CycleAlignment),
        KeyCode::Char('v') => Some(Action::ToggleVariant),
        KeyCode::Char('s') | KeyCode::Enter => Some(Action::Export),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeMode;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn search_step_types_into_query() {
        let state = AppState::new(ThemeMode::Dark);
        assert_eq!(
            map_input_to_action(&state, key(KeyCode::Char('q'))),
            Some(Action::InputChar('q'))
        );
        assert_eq!(
            map_input_to_action(&state, key(KeyCode::Enter)),
            Some(Action::StartSearch)
        );
    }

    #[test]
    fn preview_step_has_card_controls() {
        let mut state = AppState::new(ThemeMode::Dark);
        state.step = Step::Preview;
        assert_eq!(
            map_input_to_action(&state, key(KeyCode::Char('f'))),
            Some(Action::FetchCover)
        );
        assert_eq!(
            map_input_to_action(&state, key(KeyCode::Esc)),
            Some(Action::Back)
        );
    }
}
