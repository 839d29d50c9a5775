//! Configuration types for `config.toml`

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application settings (`~/.config/adx/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub refresh: RefreshSettings,

    #[serde(default)]
    pub watcher: WatcherSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Tool and output locations
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathSettings {
    /// Android SDK root; wins over `ANDROID_HOME`
    #[serde(default)]
    pub android_home: Option<PathBuf>,

    /// Where screenshots and recordings go (default `~/Downloads`)
    #[serde(default)]
    pub media_dir: Option<PathBuf>,
}

/// Device list refresh timing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RefreshSettings {
    #[serde(default = "default_periodic_secs")]
    pub periodic_secs: u64,

    /// Pause after a device change before re-enumerating
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_emulator_launch_delay_secs")]
    pub emulator_launch_delay_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            periodic_secs: default_periodic_secs(),
            settle_ms: default_settle_ms(),
            emulator_launch_delay_secs: default_emulator_launch_delay_secs(),
        }
    }
}

impl RefreshSettings {
    pub fn periodic(&self) -> Duration {
        Duration::from_secs(self.periodic_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn emulator_launch_delay(&self) -> Duration {
        Duration::from_secs(self.emulator_launch_delay_secs)
    }
}

/// `adb track-devices` watcher
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WatcherSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long the watcher waits for room in its queue before dropping
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

/// Interface settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Entries kept in the log panel
    #[serde(default = "default_log_history")]
    pub log_history: usize,

    /// Editor for AVD configs; falls back to `$EDITOR`, then `vi`
    #[serde(default)]
    pub editor: Option<String>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            log_history: default_log_history(),
            editor: None,
        }
    }
}

fn default_periodic_secs() -> u64 {
    5
}

fn default_settle_ms() -> u64 {
    500
}

fn default_emulator_launch_delay_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_send_timeout_ms() -> u64 {
    adx_daemon::tracking::DEFAULT_SEND_TIMEOUT_MS
}

fn default_log_history() -> usize {
    adx_core::DEFAULT_HISTORY_CAPACITY
}
