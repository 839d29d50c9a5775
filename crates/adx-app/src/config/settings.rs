//! Settings loader for `~/.config/adx/config.toml`

use std::path::{Path, PathBuf};

use adx_core::prelude::*;
use adx_daemon::{default_media_dir, SdkPaths};

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const ADX_DIR: &str = "adx";

/// `~/.config/adx` (platform config dir)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(ADX_DIR))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CONFIG_FILENAME))
}

/// Load settings from the default location
///
/// Never fails: a missing file means defaults, an unreadable or malformed
/// one is logged and replaced by defaults.
pub fn load_settings() -> Settings {
    match default_config_path() {
        Some(path) => load_settings_from(&path),
        None => {
            debug!("No config directory on this platform, using defaults");
            Settings::default()
        }
    }
}

/// Load settings from an explicit file
pub fn load_settings_from(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            return Settings::default();
        }
    };

    match parse_settings(&content) {
        Ok(settings) => {
            debug!("Loaded settings from {:?}", config_path);
            settings
        }
        Err(e) => {
            warn!("Ignoring {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Parse and sanity-check settings text
pub fn parse_settings(content: &str) -> Result<Settings> {
    let mut settings: Settings =
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;

    if settings.refresh.periodic_secs == 0 {
        warn!("refresh.periodic_secs must be positive, using the default");
        settings.refresh.periodic_secs = super::types::RefreshSettings::default().periodic_secs;
    }
    if settings.ui.log_history == 0 {
        warn!("ui.log_history must be positive, keeping one entry");
        settings.ui.log_history = 1;
    }

    Ok(settings)
}

impl Settings {
    /// SDK layout: config `android_home`, then the environment
    pub fn sdk_paths(&self) -> SdkPaths {
        SdkPaths::resolve(self.paths.android_home.as_deref())
    }

    pub fn media_dir(&self) -> PathBuf {
        self.paths
            .media_dir
            .clone()
            .unwrap_or_else(default_media_dir)
    }
}
