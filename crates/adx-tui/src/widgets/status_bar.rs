//! Status bar widget
//!
//! One line under the title: device counts by connection type, the
//! active filter and the operations currently in flight.

use adx_app::AppState;
use adx_core::catalog;
use adx_daemon::count_by_type;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

const SEPARATOR: &str = " • ";

/// Status bar widget showing device and activity summary
pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// `Devices: 🔵 1 🟡 2`, or a note when nothing is attached
    fn devices_segment(&self) -> String {
        let counts: Vec<String> = count_by_type(&self.state.devices)
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(kind, n)| format!("{} {}", kind.indicator(), n))
            .collect();

        if counts.is_empty() {
            "No devices connected".to_string()
        } else {
            format!("Devices: {}", counts.join(" "))
        }
    }

    fn filter_segments(&self) -> Vec<String> {
        if !self.state.is_filtering() {
            return Vec::new();
        }

        let mut segments = vec![format!("Filter: '{}'", self.state.search_query)];
        if self.state.filtered_commands.is_empty() {
            segments.push("No matching commands".to_string());
        } else {
            segments.push(format!(
                "Commands: {}/{}",
                self.state.filtered_commands.len(),
                catalog().len()
            ));
        }
        segments
    }

    /// `Active: 📸 Screenshot, 📶 Connecting`
    fn active_segment(&self) -> Option<String> {
        let mut labels: Vec<&str> = self
            .state
            .activities
            .keys()
            .filter_map(|a| a.status_label())
            .collect();
        labels.dedup();

        if labels.is_empty() {
            None
        } else {
            Some(format!("Active: {}", labels.join(", ")))
        }
    }

    /// Plain text of the bar
    pub fn text(&self) -> String {
        let mut segments = vec![self.devices_segment()];
        segments.extend(self.filter_segments());
        segments.extend(self.active_segment());
        segments.join(SEPARATOR)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(format!(" {} ", self.text()));
        Paragraph::new(line)
            .style(styles::status_bar())
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adx_app::Activity;
    use adx_daemon::test_utils::test_device;

    #[test]
    fn test_no_devices() {
        let state = AppState::new();
        assert_eq!(StatusBar::new(&state).text(), "No devices connected");
    }

    #[test]
    fn test_device_counts_skip_empty_types() {
        let mut state = AppState::new();
        state.set_devices(vec![
            test_device("emulator-5554"),
            test_device("emulator-5556"),
            test_device("192.168.1.20:4444"),
        ]);

        assert_eq!(StatusBar::new(&state).text(), "Devices: 🟡 2 🟢 1");
    }

    #[test]
    fn test_filter_and_command_count() {
        let mut state = AppState::new();
        for c in "wifi".chars() {
            state.push_query_char(c);
        }

        let text = StatusBar::new(&state).text();
        assert!(text.contains("Filter: 'wifi'"));
        assert!(text.contains(&format!(
            "Commands: {}/{}",
            state.filtered_commands.len(),
            catalog().len()
        )));
    }

    #[test]
    fn test_filter_without_matches() {
        let mut state = AppState::new();
        for c in "zzz".chars() {
            state.push_query_char(c);
        }

        assert_eq!(
            StatusBar::new(&state).text(),
            "No devices connected • Filter: 'zzz' • No matching commands"
        );
    }

    #[test]
    fn test_active_operations_listed() {
        let mut state = AppState::new();
        state.begin(Activity::Screenshot);
        state.begin(Activity::WifiConnect);
        // Not shown in the bar
        state.begin(Activity::LoadingDevices);

        assert_eq!(
            StatusBar::new(&state).text(),
            "No devices connected • Active: 📸 Screenshot, 📶 Connecting"
        );
    }
}
