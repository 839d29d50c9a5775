//! Android SDK location and tool availability
//!
//! Resolves where `adb` and `emulator` live and probes whether they run.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

/// Resolved SDK locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkPaths {
    /// SDK root (`ANDROID_HOME`)
    pub android_home: PathBuf,
    /// `platform-tools/adb`
    pub adb: PathBuf,
    /// `emulator/emulator`
    pub emulator: PathBuf,
    /// Directory holding `*.ini` AVD descriptors (`~/.android/avd`)
    pub avd_home: PathBuf,
}

impl SdkPaths {
    /// Resolve SDK paths
    ///
    /// Order: explicit override, `ANDROID_HOME`, `ANDROID_SDK_ROOT`,
    /// `~/Library/Android/sdk`.
    pub fn resolve(android_home_override: Option<&Path>) -> Self {
        let android_home = android_home_override
            .map(Path::to_path_buf)
            .or_else(|| non_empty_env("ANDROID_HOME"))
            .or_else(|| non_empty_env("ANDROID_SDK_ROOT"))
            .unwrap_or_else(default_sdk_location);

        Self::from_home(android_home)
    }

    /// Derive tool paths from an SDK root
    pub fn from_home(android_home: impl Into<PathBuf>) -> Self {
        let android_home = android_home.into();
        Self {
            adb: android_home.join("platform-tools").join("adb"),
            emulator: android_home.join("emulator").join("emulator"),
            avd_home: default_avd_home(),
            android_home,
        }
    }

    /// Override where AVD descriptors are read from
    pub fn with_avd_home(mut self, avd_home: impl Into<PathBuf>) -> Self {
        self.avd_home = avd_home.into();
        self
    }
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn default_sdk_location() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Library")
        .join("Android")
        .join("sdk")
}

fn default_avd_home() -> PathBuf {
    if let Some(dir) = non_empty_env("ANDROID_AVD_HOME") {
        return dir;
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".android")
        .join("avd")
}

/// Cached availability of the SDK tools
#[derive(Debug, Clone, Default)]
pub struct ToolAvailability {
    /// Whether `adb version` ran successfully
    pub adb: bool,

    /// Whether `emulator -version` ran successfully
    pub emulator: bool,

    /// `adb` found on `PATH` when the SDK copy is missing
    pub adb_on_path: Option<PathBuf>,
}

impl ToolAvailability {
    /// Check tool availability (run once at startup)
    pub async fn check(paths: &SdkPaths) -> Self {
        let adb = probe(&paths.adb, "version").await;
        let emulator = probe(&paths.emulator, "-version").await;
        let adb_on_path = if adb {
            None
        } else {
            which::which("adb").ok()
        };

        Self {
            adb,
            emulator,
            adb_on_path,
        }
    }

    /// The adb executable to use, preferring the SDK copy
    pub fn adb_path(&self, paths: &SdkPaths) -> PathBuf {
        match (&self.adb, &self.adb_on_path) {
            (false, Some(found)) => found.clone(),
            _ => paths.adb.clone(),
        }
    }

    /// Get user-friendly message for unavailable Android tools
    pub fn adb_unavailable_message(&self) -> Option<&'static str> {
        if self.adb || self.adb_on_path.is_some() {
            None
        } else {
            Some("adb not found. Set ANDROID_HOME or paths.android_home in the config file.")
        }
    }

    pub fn emulator_unavailable_message(&self) -> Option<&'static str> {
        if self.emulator {
            None
        } else {
            Some("Android emulator not found under ANDROID_HOME/emulator.")
        }
    }
}

async fn probe(program: &Path, arg: &str) -> bool {
    Command::new(program)
        .arg(arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .inspect_err(|e| tracing::debug!("probe of {} failed: {}", program.display(), e))
        .unwrap_or(false)
}
