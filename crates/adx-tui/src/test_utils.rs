//! Test utilities for render verification
//!
//! Widgets and full screens are drawn into ratatui's `TestBackend` and
//! read back as text.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};

pub const TEST_WIDTH: u16 = 80;
pub const TEST_HEIGHT: u16 = 24;

/// `TestBackend` terminal with text accessors
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    /// 80x24
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    /// Draw a full frame, e.g. with `render::view`
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        self.content().contains(text)
    }

    pub fn line_contains(&self, line: u16, text: &str) -> bool {
        line_text(self.buffer(), line).contains(text)
    }

    /// Every row, newline terminated
    pub fn content(&self) -> String {
        let buffer = self.buffer();
        (0..buffer.area.height)
            .map(|y| line_text(buffer, y) + "\n")
            .collect()
    }

    /// Rows without trailing blanks, trailing empty rows dropped
    pub fn content_trimmed(&self) -> String {
        let buffer = self.buffer();
        let mut rows: Vec<String> = (0..buffer.area.height)
            .map(|y| line_text(buffer, y).trim_end().to_string())
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        rows.join("\n")
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Text of one row; the cells hidden behind a wide glyph are skipped
fn line_text(buffer: &Buffer, y: u16) -> String {
    let mut text = String::new();
    if y >= buffer.area.height {
        return text;
    }

    let mut x = 0;
    while x < buffer.area.width {
        let symbol = buffer[(x, y)].symbol();
        text.push_str(symbol);
        let width = Span::raw(symbol).width().max(1);
        x += u16::try_from(width).unwrap_or(1);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_terminal_size() {
        let term = TestTerminal::new();
        assert_eq!(term.area(), Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT));
    }

    #[test]
    fn test_wide_glyphs_read_back_cleanly() {
        let mut term = TestTerminal::with_size(20, 1);
        term.render_widget(Paragraph::new("🟡 2 🟢 1"), term.area());

        assert!(term.line_contains(0, "🟡 2 🟢 1"));
    }

    #[test]
    fn test_content_trimmed() {
        let mut term = TestTerminal::with_size(10, 4);
        term.render_widget(Paragraph::new("a\nb"), term.area());

        assert_eq!(term.content_trimmed(), "a\nb");
        assert_eq!(term.content().lines().count(), 4);
    }
}
