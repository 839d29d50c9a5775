//! Bordered panel with the most recent log entries

use adx_core::{LogEntry, LogHistory};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

/// Log history panel
pub struct LogPanel<'a> {
    history: &'a LogHistory,
}

impl<'a> LogPanel<'a> {
    pub fn new(history: &'a LogHistory) -> Self {
        Self { history }
    }

    /// Panel height including the border, 0 when there is nothing to show
    pub fn height(history: &LogHistory) -> u16 {
        if history.is_empty() {
            return 0;
        }
        let lines: usize = history.iter().map(|e| entry_lines(e).len()).sum();
        u16::try_from(lines + 2).unwrap_or(u16::MAX)
    }
}

/// `[HH:MM:SS] ✓ first line`, then each further non-blank line indented
fn entry_lines(entry: &LogEntry) -> Vec<Line<'static>> {
    let (icon, style) = styles::severity(entry.severity);
    let time = entry.timestamp.format("%H:%M:%S");

    let mut lines = Vec::new();
    for (i, line) in entry.message.split('\n').enumerate() {
        let line = line.trim();
        if i == 0 {
            lines.push(Line::styled(format!("[{time}] {icon} {line}"), style));
        } else if !line.is_empty() {
            lines.push(Line::styled(format!(" {line}"), style));
        }
    }
    lines
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self.history.iter().flat_map(entry_lines).collect();
        Paragraph::new(lines)
            .block(styles::panel(false))
            .render(area, buf);
    }
}
