//! Custom widget components

mod header;
mod log_panel;
mod menu;
mod progress;
mod select_list;
mod status_bar;
mod text_input;

pub use header::{Header, KeyHints, TITLE};
pub use log_panel::LogPanel;
pub use menu::Menu;
pub use progress::{format_elapsed, spinner_frame, Progress};
pub use select_list::{DeviceList, EmulatorList};
pub use status_bar::StatusBar;
pub use text_input::TextInput;

use ratatui::text::{Line, Span};

use crate::theme::styles;

/// `> text` highlighted, or `  text`
pub(crate) fn cursor_line(selected: bool, text: String) -> Line<'static> {
    if selected {
        Line::from(vec![
            Span::styled("> ", styles::title()),
            Span::styled(text, styles::selected()),
        ])
    } else {
        Line::from(vec![Span::raw("  "), Span::styled(text, styles::text_primary())])
    }
}

/// Scroll just far enough to keep `selected` on screen
pub(crate) fn scroll_offset(selected: Option<usize>, height: u16) -> u16 {
    let height = usize::from(height);
    match selected {
        Some(line) if height > 0 && line >= height => {
            u16::try_from(line + 1 - height).unwrap_or(u16::MAX)
        }
        _ => 0,
    }
}
