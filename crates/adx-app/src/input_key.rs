//! Terminal-independent key events.
//!
//! The TUI converts crossterm events into [`InputKey`] at its boundary so
//! the controller never depends on a terminal library.

/// A key press as the controller sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character, including space
    Char(char),
    /// Character with Ctrl held (Ctrl+C, ...)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,

    Enter,
    Esc,
    Tab,
    Backspace,
    Delete,
}

impl InputKey {
    /// The character this key types into a text field, if any
    pub fn typed_char(&self) -> Option<char> {
        match self {
            InputKey::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }
}
