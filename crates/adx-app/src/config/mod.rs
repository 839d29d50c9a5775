//! Configuration file parsing for adx
//!
//! Reads `~/.config/adx/config.toml`. The file is optional and read-only:
//! adx never writes it back.

pub mod settings;
pub mod types;

pub use settings::{config_dir, default_config_path, load_settings, load_settings_from, parse_settings};
pub use types::*;
