//! Key event handlers for the controller modes

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, Mode};

/// Convert a key event to a message based on the current mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Ctrl+C always quits
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    // Esc ends an active recording wherever the user is
    if key == InputKey::Esc && state.is_recording() {
        return Some(Message::StopRecording);
    }

    match state.mode {
        Mode::Menu => handle_key_menu(key),
        Mode::DeviceSelect | Mode::EmulatorSelect => handle_key_list(key),
        Mode::TextInput => handle_key_text_input(key),
    }
}

/// Menu: every printable key (including `q`) goes to the search query
fn handle_key_menu(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up => Some(Message::SelectPrevious),
        InputKey::Down => Some(Message::SelectNext),
        InputKey::Enter => Some(Message::Activate),
        InputKey::Esc => Some(Message::Cancel),
        InputKey::Backspace => Some(Message::Backspace),
        _ => key.typed_char().map(Message::TypeChar),
    }
}

/// Device and emulator pickers, with vim-style movement
fn handle_key_list(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k' | 'h') => Some(Message::SelectPrevious),
        InputKey::Down | InputKey::Char('j' | 'l') => Some(Message::SelectNext),
        InputKey::Enter => Some(Message::Activate),
        InputKey::Esc => Some(Message::Cancel),
        _ => None,
    }
}

fn handle_key_text_input(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::Activate),
        InputKey::Esc => Some(Message::Cancel),
        InputKey::Backspace => Some(Message::Backspace),
        _ => key.typed_char().map(Message::TypeChar),
    }
}
