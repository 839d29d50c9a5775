//! Free-text prompt with a block cursor

use adx_app::state::PendingText;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget, Wrap},
};

use crate::theme::styles;

const CURSOR: &str = "█";

pub struct TextInput<'a> {
    pending: &'a PendingText,
}

impl<'a> TextInput<'a> {
    pub fn new(pending: &'a PendingText) -> Self {
        Self { pending }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines: Vec<Line> = self.pending.prompt.lines().map(Line::from).collect();
        lines.push(Line::default());
        lines.push(Line::styled(
            format!("> {}{CURSOR}", self.pending.input),
            styles::input(),
        ));
        lines.push(Line::default());
        lines.push(Line::styled(
            "Press Enter to submit, Esc to cancel",
            styles::text_muted(),
        ));
        lines
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use adx_app::state::TextAction;

    #[test]
    fn test_prompt_and_cursor() {
        let mut pending = PendingText::new(
            TextAction::WifiConnect,
            "Enter IP address\nDefaults to port 4444",
        );
        pending.input = "192.168.1.".to_string();

        let mut term = TestTerminal::new();
        term.render_widget(TextInput::new(&pending), term.area());

        insta::assert_snapshot!(term.content_trimmed(), @r"
        Enter IP address
        Defaults to port 4444

        > 192.168.1.█

        Press Enter to submit, Esc to cancel
        ");
    }
}
