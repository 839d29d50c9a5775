//! Main render/view function (View in TEA pattern)


use adx_app::{AppState, Mode};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::layout::{self, Sections};
use crate::theme::styles;
use crate::widgets;

/// Log panel is shown under the menu and the text prompt only
fn shows_log(state: &AppState) -> bool {
    matches!(state.mode, Mode::Menu | Mode::TextInput)
}

/// Render the complete UI
pub fn view(frame: &mut Frame, state: &AppState) {
    let sections = Sections {
        banner: state.error_banner.is_some(),
        progress_lines: widgets::Progress::line_count(state),
        log_height: if shows_log(state) {
            widgets::LogPanel::height(&state.log)
        } else {
            0
        },
    };
    let areas = layout::create(frame.area(), sections);

    frame.render_widget(widgets::Header, areas.header);
    frame.render_widget(widgets::StatusBar::new(state), areas.status);

    if let Some(banner) = &state.error_banner {
        frame.render_widget(
            Paragraph::new(Line::styled(format!("Error: {banner}"), styles::error_banner())),
            areas.banner,
        );
    }

    match state.mode {
        Mode::Menu => frame.render_widget(widgets::Menu::new(state), areas.body),
        Mode::DeviceSelect => frame.render_widget(widgets::DeviceList::new(state), areas.body),
        Mode::EmulatorSelect => {
            frame.render_widget(widgets::EmulatorList::new(state), areas.body)
        }
        Mode::TextInput => {
            if let Some(pending) = &state.pending_text {
                frame.render_widget(widgets::TextInput::new(pending), areas.body);
            }
        }
    }

    frame.render_widget(widgets::Progress::new(state), areas.progress);

    if sections.log_height > 0 {
        frame.render_widget(widgets::LogPanel::new(&state.log), areas.log);
    }

    frame.render_widget(widgets::KeyHints::new(state), areas.footer);
}
