//! adx-tui - Terminal UI for adx
//!
//! Renders [`adx_app::AppState`] with ratatui, turns crossterm key events
//! into controller messages and owns the main loop that ties the two
//! together with the background refresh producers.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::run;
