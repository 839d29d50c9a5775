//! Spinner lines for in-flight operations

use std::time::{Duration, Instant};

use adx_app::AppState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// `(4.2s)` under a minute, `(2m05s)` from then on
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("({}m{:02}s)", secs / 60, secs % 60)
    } else {
        format!("({:.1}s)", elapsed.as_secs_f64())
    }
}

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// One line per activity, oldest kind first
pub struct Progress<'a> {
    state: &'a AppState,
    now: Instant,
}

impl<'a> Progress<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self::at(state, Instant::now())
    }

    /// Render as of `now`
    pub fn at(state: &'a AppState, now: Instant) -> Self {
        Self { state, now }
    }

    pub fn line_count(state: &AppState) -> u16 {
        u16::try_from(state.activities.len()).unwrap_or(u16::MAX)
    }

    pub fn texts(&self) -> Vec<String> {
        let frame = spinner_frame(self.state.spinner);
        self.state
            .activities
            .iter()
            .map(|(activity, started)| {
                let elapsed = self.now.saturating_duration_since(*started);
                format!(
                    "{frame} {} {}",
                    activity.progress_text(),
                    format_elapsed(elapsed)
                )
            })
            .collect()
    }
}

impl Widget for Progress<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .texts()
            .into_iter()
            .map(|t| Line::styled(t, styles::progress()))
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adx_app::Activity;

    #[test]
    fn test_format_elapsed_under_a_minute() {
        assert_eq!(format_elapsed(Duration::from_millis(0)), "(0.0s)");
        assert_eq!(format_elapsed(Duration::from_millis(4_230)), "(4.2s)");
        assert_eq!(format_elapsed(Duration::from_millis(59_940)), "(59.9s)");
    }

    #[test]
    fn test_format_elapsed_minutes() {
        assert_eq!(format_elapsed(Duration::from_secs(60)), "(1m00s)");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "(2m05s)");
    }

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner_frame(0), "⠋");
        assert_eq!(spinner_frame(9), "⠏");
        assert_eq!(spinner_frame(10), "⠋");
    }

    #[test]
    fn test_progress_lines() {
        let mut state = AppState::new();
        let start = Instant::now();
        state.activities.insert(Activity::Screenshot, start);
        state.activities.insert(Activity::Recording, start);
        state.spinner = 3;

        let texts = Progress::at(&state, start + Duration::from_millis(1_500)).texts();

        assert_eq!(
            texts,
            vec![
                "⠸ Taking screenshot (1.5s)".to_string(),
                "⠸ Recording screen • Press Esc to stop (1.5s)".to_string(),
            ]
        );
        assert_eq!(Progress::line_count(&state), 2);
    }
}
