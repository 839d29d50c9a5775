//! Color palette

use ratatui::style::Color;

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Cyan;

// --- Accent ---
pub const ACCENT: Color = Color::Cyan;
pub const CONTRAST_FG: Color = Color::Black;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;

// --- Status ---
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_ORANGE: Color = Color::Rgb(255, 175, 0);

// --- Status bar ---
pub const STATUS_BAR_FG: Color = Color::Gray;
pub const STATUS_BAR_BG: Color = Color::Rgb(48, 48, 48);

// --- Log severity ---
pub const LOG_SUCCESS: Color = Color::Green;
pub const LOG_ERROR: Color = Color::LightRed;
pub const LOG_INFO: Color = Color::Gray;
