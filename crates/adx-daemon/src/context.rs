//! Shared inputs for device operations

use std::path::PathBuf;
use std::time::Duration;

use crate::runner::Adb;
use crate::tool_availability::SdkPaths;

/// Fixed waits between bridge steps
///
/// Devices need a moment after UI-mode switches, recordings need time to
/// finalize the file, and WiFi links need time to show up in `adb devices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    pub ui_settle: Duration,
    pub recording_finalize: Duration,
    pub wifi_settle: Duration,
    pub tcpip_restart: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            ui_settle: Duration::from_secs(1),
            recording_finalize: Duration::from_secs(2),
            wifi_settle: Duration::from_millis(500),
            tcpip_restart: Duration::from_secs(2),
        }
    }
}

impl Delays {
    /// No waiting at all, for tests
    pub fn none() -> Self {
        Self {
            ui_settle: Duration::ZERO,
            recording_finalize: Duration::ZERO,
            wifi_settle: Duration::ZERO,
            tcpip_restart: Duration::ZERO,
        }
    }
}

pub(crate) fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

/// Everything a device operation needs besides the device itself
#[derive(Debug, Clone)]
pub struct OpsContext {
    pub adb: Adb,
    pub emulator: PathBuf,
    /// Where screenshots and recordings are written
    pub media_dir: PathBuf,
    pub delays: Delays,
}

impl OpsContext {
    pub fn new(sdk: &SdkPaths, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            adb: Adb::new(&sdk.adb),
            emulator: sdk.emulator.clone(),
            media_dir: media_dir.into(),
            delays: Delays::default(),
        }
    }

    /// Swap the bridge client, e.g. for one backed by a mock runner
    pub fn with_adb(mut self, adb: Adb) -> Self {
        self.adb = adb;
        self
    }

    pub fn with_delays(mut self, delays: Delays) -> Self {
        self.delays = delays;
        self
    }
}

/// Default media directory: `~/Downloads`
pub fn default_media_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_sdk() {
        let sdk = SdkPaths::from_home("/opt/android");
        let ctx = OpsContext::new(&sdk, "/tmp/media").with_delays(Delays::none());

        assert_eq!(ctx.adb.path(), sdk.adb.as_path());
        assert_eq!(ctx.emulator, PathBuf::from("/opt/android/emulator/emulator"));
        assert_eq!(ctx.media_dir, PathBuf::from("/tmp/media"));
        assert!(ctx.delays.ui_settle.is_zero());
    }

    #[test]
    fn test_default_delays() {
        let delays = Delays::default();
        assert_eq!(delays.wifi_settle, Duration::from_millis(500));
        assert_eq!(delays.recording_finalize, Duration::from_secs(2));
    }
}
