//! Device and emulator pickers

use adx_app::{Activity, AppState};
use adx_core::CommandId;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

use super::{cursor_line, scroll_offset};

/// Device picker for commands that target one device
pub struct DeviceList<'a> {
    state: &'a AppState,
}

impl<'a> DeviceList<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn lines(&self) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = vec![Line::from("Select a device:"), Line::default()];
        let mut selected_line = None;

        if self.state.devices.is_empty() {
            lines.push(Line::styled("No devices connected", styles::text_muted()));
        }

        for (i, device) in self.state.devices.iter().enumerate() {
            let selected = i == self.state.selected_device;
            if selected {
                selected_line = Some(lines.len());
            }
            lines.push(cursor_line(
                selected,
                format!("{} {}", device.status_indicator(), device.display_name()),
            ));

            let extended = device.extended_info();
            if !extended.is_empty() {
                lines.push(Line::styled(format!("    {extended}"), styles::text_muted()));
            }
        }

        lines.push(Line::default());
        lines.push(Line::styled(
            "Press Enter to select, Esc to go back",
            styles::text_muted(),
        ));
        (lines, selected_line)
    }
}

impl Widget for DeviceList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (lines, selected_line) = self.lines();
        let offset = scroll_offset(selected_line, area.height);
        Paragraph::new(lines).scroll((offset, 0)).render(area, buf);
    }
}

/// AVD picker for launching or configuring an emulator
pub struct EmulatorList<'a> {
    state: &'a AppState,
}

impl<'a> EmulatorList<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn configuring(&self) -> bool {
        self.state.pending_command == Some(CommandId::ConfigureEmulator)
    }

    fn lines(&self) -> (Vec<Line<'static>>, Option<usize>) {
        let (heading, confirm) = if self.configuring() {
            ("Select an emulator to configure:", "Press Enter to edit, Esc to go back")
        } else {
            ("Select an emulator to launch:", "Press Enter to launch, Esc to go back")
        };
        let mut lines = vec![Line::from(heading), Line::default()];

        if self.state.avds.is_empty() {
            if self.state.is_active(Activity::LoadingAvds) {
                lines.push(Line::styled("Loading emulators…", styles::text_muted()));
            } else {
                lines.push(Line::from(
                    "No AVDs found. Create one with Android Studio or avdmanager.",
                ));
            }
            lines.push(Line::default());
            lines.push(Line::styled("Press Esc to go back", styles::text_muted()));
            return (lines, None);
        }

        let mut selected_line = None;
        for (i, avd) in self.state.avds.iter().enumerate() {
            let selected = i == self.state.selected_emulator;
            if selected {
                selected_line = Some(lines.len());
            }
            lines.push(cursor_line(selected, avd.label()));
        }

        lines.push(Line::default());
        lines.push(Line::styled(confirm, styles::text_muted()));
        (lines, selected_line)
    }
}

impl Widget for EmulatorList<'_> {
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
    use adx_app::Mode;
    use adx_daemon::test_utils::{test_avd, test_device, test_device_with_model};
    use adx_daemon::Device;

    #[test]
    fn test_device_list_marks_selection() {
        let mut state = AppState::new();
        state.mode = Mode::DeviceSelect;
        state.set_devices(vec![
            test_device_with_model("R58M123ABC", "SM_G973U"),
            test_device("192.168.1.20:4444"),
        ]);
        state.selected_device = 1;

        let mut term = TestTerminal::new();
        term.render_widget(DeviceList::new(&state), term.area());

        assert!(term.line_contains(0, "Select a device:"));
        assert!(term.buffer_contains("R58M123ABC (SM_G973U)"));
        assert!(term.line_contains(3, "> "));
        assert!(term.buffer_contains("192.168.1.20:4444"));
        assert!(term.buffer_contains("Press Enter to select, Esc to go back"));
    }

    #[test]
    fn test_device_list_shows_extended_info() {
        let mut state = AppState::new();
        let mut device = Device::new("R58M123ABC", "unauthorized");
        device.transport_id = "3".to_string();
        state.set_devices(vec![device]);

        let mut term = TestTerminal::new();
        term.render_widget(DeviceList::new(&state), term.area());

        assert!(term.buffer_contains("    transport 3 • unauthorized"));
    }

    #[test]
    fn test_emulator_list_headings() {
        let mut state = AppState::new();
        state.set_avds(vec![test_avd("Pixel_7"), test_avd("Pixel_Tablet")]);
        state.pending_command = Some(CommandId::LaunchEmulator);

        let mut term = TestTerminal::new();
        term.render_widget(EmulatorList::new(&state), term.area());
        assert!(term.line_contains(0, "Select an emulator to launch:"));
        assert!(term.line_contains(2, "> Pixel_7 (API 34)"));
        assert!(term.line_contains(3, "  Pixel_Tablet (API 34)"));

        state.pending_command = Some(CommandId::ConfigureEmulator);
        let mut term = TestTerminal::new();
        term.render_widget(EmulatorList::new(&state), term.area());
        assert!(term.line_contains(0, "Select an emulator to configure:"));
        assert!(term.buffer_contains("Press Enter to edit, Esc to go back"));
    }

    #[test]
    fn test_emulator_list_empty_and_loading() {
        let mut state = AppState::new();
        state.begin(Activity::LoadingAvds);

        let mut term = TestTerminal::new();
        term.render_widget(EmulatorList::new(&state), term.area());
        assert!(term.buffer_contains("Loading emulators"));

        state.finish(Activity::LoadingAvds);
        let mut term = TestTerminal::new();
        term.render_widget(EmulatorList::new(&state), term.area());
        assert!(term.buffer_contains("No AVDs found."));
    }
}
