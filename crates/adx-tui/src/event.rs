//! Terminal event polling

use std::time::Duration;

use adx_app::{InputKey, Message};
use adx_core::prelude::*;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Spinner cadence; a tick is produced whenever no key arrives in time
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Convert crossterm KeyEvent to InputKey
pub fn key_event_to_input(key: KeyEvent) -> Option<InputKey> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputKey::CharCtrl(c))
        }
        KeyCode::Char(c) => Some(InputKey::Char(c)),
        KeyCode::Enter => Some(InputKey::Enter),
        KeyCode::Esc => Some(InputKey::Esc),
        KeyCode::Tab => Some(InputKey::Tab),
        KeyCode::Backspace => Some(InputKey::Backspace),
        KeyCode::Delete => Some(InputKey::Delete),
        KeyCode::Up => Some(InputKey::Up),
        KeyCode::Down => Some(InputKey::Down),
        KeyCode::Left => Some(InputKey::Left),
        KeyCode::Right => Some(InputKey::Right),
        KeyCode::Home => Some(InputKey::Home),
        KeyCode::End => Some(InputKey::End),
        _ => None,
    }
}

/// Wait up to one tick for a key press
pub fn poll() -> Result<Option<Message>> {
    if !event::poll(TICK_RATE)? {
        return Ok(Some(Message::Tick));
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            Ok(key_event_to_input(key).map(Message::Key))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_char_conversion() {
        assert_eq!(
            key_event_to_input(plain(KeyCode::Char('q'))),
            Some(InputKey::Char('q'))
        );
    }

    #[test]
    fn test_ctrl_c_is_control_char() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_event_to_input(key), Some(InputKey::CharCtrl('c')));
    }

    #[test]
    fn test_shifted_chars_stay_printable() {
        let key = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(key_event_to_input(key), Some(InputKey::Char('W')));

        let key = KeyEvent::new(KeyCode::Char(':'), KeyModifiers::SHIFT);
        assert_eq!(key_event_to_input(key), Some(InputKey::Char(':')));
    }

    #[test]
    fn test_navigation_and_action_keys() {
        let cases = [
            (KeyCode::Up, InputKey::Up),
            (KeyCode::Down, InputKey::Down),
            (KeyCode::Left, InputKey::Left),
            (KeyCode::Right, InputKey::Right),
            (KeyCode::Home, InputKey::Home),
            (KeyCode::End, InputKey::End),
            (KeyCode::Enter, InputKey::Enter),
            (KeyCode::Esc, InputKey::Esc),
            (KeyCode::Tab, InputKey::Tab),
            (KeyCode::Backspace, InputKey::Backspace),
            (KeyCode::Delete, InputKey::Delete),
        ];
        for (code, expected) in cases {
            assert_eq!(key_event_to_input(plain(code)), Some(expected), "{code:?}");
        }
    }

    #[test]
    fn test_unsupported_key_returns_none() {
        assert_eq!(key_event_to_input(plain(KeyCode::Insert)), None);
        assert_eq!(key_event_to_input(plain(KeyCode::F(5))), None);
    }
}
