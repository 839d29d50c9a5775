//! Command menu: categorized when idle, ranked while filtering

use adx_app::AppState;
use adx_core::{categories, CatalogEntry};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

use super::{cursor_line, scroll_offset};

/// Main menu body
pub struct Menu<'a> {
    state: &'a AppState,
}

impl<'a> Menu<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn heading(&self) -> Line<'static> {
        let text = if self.state.is_filtering() {
            format!("Available commands (filter: {}):", self.state.search_query)
        } else {
            "Available commands:".to_string()
        };
        Line::from(text)
    }

    fn entry_line(&self, index: usize, entry: &CatalogEntry) -> Line<'static> {
        cursor_line(index == self.state.selected_command, entry.name.to_string())
    }

    /// All lines, plus the index of the highlighted one
    fn lines(&self) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = vec![self.heading(), Line::default()];
        let mut selected_line = None;

        if self.state.is_filtering() {
            for (i, entry) in self.state.filtered_commands.iter().enumerate() {
                if i == self.state.selected_command {
                    selected_line = Some(lines.len());
                }
                lines.push(self.entry_line(i, entry));
            }
            if self.state.filtered_commands.is_empty() {
                lines.push(Line::styled("  No matching commands", styles::text_muted()));
            }
            lines.push(Line::default());
        } else {
            // Flattened categories follow catalog order, so one index works
            let mut index = 0;
            for (category, entries) in categories() {
                lines.push(Line::styled(category.label(), styles::category()));
                for entry in entries {
                    if index == self.state.selected_command {
                        selected_line = Some(lines.len());
                    }
                    lines.push(self.entry_line(index, entry));
                    index += 1;
                }
                lines.push(Line::default());
            }
        }

        if let Some(entry) = self.state.selected_entry() {
            lines.push(Line::styled(
                format!("→ {}", entry.description),
                styles::description(),
            ));
            lines.push(Line::default());
        }

        lines.push(Line::from(format!(
            "Connected devices: {}",
            self.state.devices.len()
        )));
        for device in &self.state.devices {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::raw(device.status_indicator()),
                Span::raw(" "),
                Span::styled(device.display_name(), styles::text_secondary()),
            ]));
        }

        (lines, selected_line)
    }
}

impl Widget for Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (lines, selected_line) = self.lines();
        let offset = scroll_offset(selected_line, area.height);
        Paragraph::new(lines).scroll((offset, 0)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use adx_daemon::test_utils::test_device_with_model;

    fn render(state: &AppState, width: u16, height: u16) -> TestTerminal {
        let mut term = TestTerminal::with_size(width, height);
        term.render_widget(Menu::new(state), term.area());
        term
    }

    #[test]
    fn test_categorized_menu() {
        let state = AppState::new();
        let term = render(&state, 60, 40);

        assert!(term.line_contains(0, "Available commands:"));
        assert!(term.line_contains(2, "Media"));
        assert!(term.line_contains(3, "> Screenshot"));
        assert!(term.buffer_contains("Device settings"));
        assert!(term.buffer_contains("Devices/emulators"));
        assert!(term.buffer_contains("→ Take a screenshot"));
        assert!(term.buffer_contains("Connected devices: 0"));
    }

    #[test]
    fn test_filtered_menu_lists_matches_only() {
        let mut state = AppState::new();
        for c in "wifi".chars() {
            state.push_query_char(c);
        }
        let term = render(&state, 60, 30);

        assert!(term.line_contains(0, "Available commands (filter: wifi):"));
        assert!(term.buffer_contains("WiFi device"));
        assert!(!term.buffer_contains("Media"));
    }

    #[test]
    fn test_no_matches_message() {
        let mut state = AppState::new();
        for c in "zzz".chars() {
            state.push_query_char(c);
        }
        let term = render(&state, 60, 20);

        assert!(term.buffer_contains("No matching commands"));
        assert!(!term.buffer_contains("→"));
    }

    #[test]
    fn test_devices_listed_under_menu() {
        let mut state = AppState::new();
        state.set_devices(vec![test_device_with_model("R58M123ABC", "SM_G973U")]);
        let term = render(&state, 60, 40);

        assert!(term.buffer_contains("Connected devices: 1"));
        assert!(term.buffer_contains("R58M123ABC (SM_G973U)"));
    }

    #[test]
    fn test_selection_scrolls_into_view() {
        let mut state = AppState::new();
        state.selected_command = state.filtered_commands.len() - 1;
        let term = render(&state, 60, 8);

        assert!(term.buffer_contains("> Refresh devices"));
        assert!(!term.buffer_contains("Available commands"));
    }

    #[test]
    fn test_menu_snapshot() {
        let mut state = AppState::new();
        for c in "scr".chars() {
            state.push_query_char(c);
        }
        state.select_next();
        let term = render(&state, 48, 12);

        insta::assert_snapshot!(term.content_trimmed(), @r"
        Available commands (filter: scr):

          Screenshot day-night
        > Screen record
          Screen size
          Screenshot
          Disconnect WiFi device

        → Record the screen

        Connected devices: 0
        ");
    }
}
