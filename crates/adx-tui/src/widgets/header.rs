//! Title line and footer key hints

use adx_app::{AppState, Mode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

pub const TITLE: &str = "Android Tools CLI";

/// Bold title with the crate version
pub struct Header;

impl Widget for Header {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(TITLE, styles::title()),
            Span::styled(
                format!("  adx {}", env!("CARGO_PKG_VERSION")),
                styles::text_muted(),
            ),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

/// Key hints for the current mode
pub struct KeyHints<'a> {
    state: &'a AppState,
}

impl<'a> KeyHints<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn text(&self) -> &'static str {
        match self.state.mode {
            Mode::Menu if self.state.is_filtering() => {
                "Type to search • ↑↓ to navigate • Enter to select • Esc to clear filter • Ctrl+C to quit"
            }
            Mode::Menu => "Type to search • ↑↓ to navigate • Enter to select • Ctrl+C to quit",
            _ => "Press Ctrl+C to quit",
        }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::styled(self.text(), styles::text_muted())).render(area, buf);
    }
}
