//! Semantic style builders

use adx_core::Severity;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn description() -> Style {
    Style::default()
        .fg(palette::TEXT_SECONDARY)
        .add_modifier(Modifier::ITALIC)
}

// --- Accent styles ---
pub fn title() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn category() -> Style {
    title()
}

/// Highlighted row in a list
pub fn selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn input() -> Style {
    title()
}

// --- Status styles ---
pub fn error_banner() -> Style {
    Style::default()
        .fg(palette::STATUS_RED)
        .add_modifier(Modifier::BOLD)
}

pub fn progress() -> Style {
    Style::default()
        .fg(palette::STATUS_ORANGE)
        .add_modifier(Modifier::BOLD)
}

pub fn status_bar() -> Style {
    Style::default()
        .fg(palette::STATUS_BAR_FG)
        .bg(palette::STATUS_BAR_BG)
}

/// Icon and color for a log entry
pub fn severity(severity: Severity) -> (&'static str, Style) {
    match severity {
        Severity::Success => ("✓", Style::default().fg(palette::LOG_SUCCESS)),
        Severity::Error => ("✗", Style::default().fg(palette::LOG_ERROR)),
        Severity::Info => ("•", Style::default().fg(palette::LOG_INFO)),
    }
}

// --- Block builders ---
pub fn panel(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            palette::BORDER_ACTIVE
        } else {
            palette::BORDER_DIM
        }))
}
