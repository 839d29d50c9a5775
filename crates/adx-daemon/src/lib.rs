//! # adx-daemon - Device Bridge Plumbing
//!
//! Everything that talks to the Android SDK tools: the `adb` client,
//! output capture for operations that print progress, device and AVD
//! enumeration, the `track-devices` watcher and the device operations.
//!
//! Depends on [`adx_core`] for error handling and logging.
//!
//! ## Public API
//!
//! ### Bridge
//! - [`Adb`] - `adb` client over a [`CommandRunner`] seam
//! - [`SdkPaths`], [`ToolAvailability`] - Locate and probe SDK tools
//! - [`OpsContext`] - Bridge, media directory and step delays for operations
//!
//! ### Output capture
//! - [`OutputCapture`] - Single process-wide capture session
//! - [`capture_function()`] - Run a closure and collect what it printed
//!
//! ### Enumeration
//! - [`list_devices()`] / [`Device`] - `adb devices -l`
//! - [`list_avds()`] / [`Avd`] - AVD descriptors on disk
//! - [`DeviceTracker`] - Streams [`DeviceChange`] events from `adb track-devices`
//!
//! ### Operations
//! - [`media`] - Screenshots, day/night pairs, screen recording
//! - [`display`] - DPI, font scale, screen size
//! - [`wifi`] - Connect, disconnect, pair

pub mod avds;
pub mod capture;
pub mod context;
pub mod devices;
pub mod display;
pub mod media;
pub mod runner;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod tool_availability;
pub mod tracking;
pub mod wifi;

pub use avds::{launch_avd, list_avds, Avd};
pub use capture::{capture_function, Captured, OutputCapture};
pub use context::{default_media_dir, Delays, OpsContext};
pub use devices::{count_by_type, list_devices, parse_devices_output, ConnectionType, Device};
pub use display::{SettingInfo, SettingKind};
pub use media::{shorten_home, RecordingHandle, ScreenRecording};
pub use runner::{Adb, CommandOutput, CommandRunner, SystemRunner};
pub use tool_availability::{SdkPaths, ToolAvailability};
pub use tracking::{parse_track_line, DeviceChange, DeviceStatus, DeviceTracker, TrackerConfig};
pub use wifi::{parse_ip_and_port, DEFAULT_WIFI_PORT};
