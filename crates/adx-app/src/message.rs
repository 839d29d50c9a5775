//! Message types for the session controller (TEA pattern)

use adx_daemon::{Avd, Device, RecordingHandle, SettingInfo, SettingKind};

use crate::input_key::InputKey;

/// Why a device list reload was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Startup,
    /// The user picked "Refresh devices"
    Manual,
    /// `adb track-devices` reported a transition
    DeviceChange,
    Periodic,
    /// Delayed reload after an emulator was started
    EmulatorLaunch,
    /// A WiFi operation or launch changed the device set
    AfterOperation,
}

impl RefreshReason {
    /// Reloads the user asked for show a spinner; background ones stay quiet
    pub fn shows_progress(&self) -> bool {
        matches!(self, RefreshReason::Startup | RefreshReason::Manual)
    }
}

/// Completion record of one background operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub success: bool,
    /// User-facing text; on failure the bare error without any prefix
    pub message: String,
    /// Lines the operation printed while it ran
    pub captured: Vec<String>,
}

impl OperationOutcome {
    pub fn success(message: impl Into<String>, captured: Vec<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            captured,
        }
    }

    pub fn failure(message: impl Into<String>, captured: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            captured,
        }
    }
}

/// All messages entering the controller's inbox
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the terminal
    Key(InputKey),

    /// Animation tick (every 100ms)
    Tick,

    /// Exit (Ctrl+C, signal handler)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation (produced from keys)
    // ─────────────────────────────────────────────────────────
    SelectPrevious,
    SelectNext,
    /// Enter: run the command, pick the device, submit the text
    Activate,
    /// Esc: clear the filter or leave the current mode
    Cancel,
    /// Printable character for the search query or text field
    TypeChar(char),
    Backspace,
    /// Esc while a recording is running, from any mode
    StopRecording,

    // ─────────────────────────────────────────────────────────
    // Enumeration
    // ─────────────────────────────────────────────────────────
    RefreshDevices {
        reason: RefreshReason,
    },
    DevicesLoaded {
        reason: RefreshReason,
        result: Result<Vec<Device>, String>,
    },
    AvdsLoaded {
        result: Result<Vec<Avd>, String>,
    },
    SettingLoaded {
        kind: SettingKind,
        /// Re-read after a change rather than the first read
        reload: bool,
        result: Result<SettingInfo, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Operation outcomes
    // ─────────────────────────────────────────────────────────
    ScreenshotDone {
        outcome: OperationOutcome,
    },
    DayNightDone {
        outcome: OperationOutcome,
    },
    RecordingStarted {
        serial: String,
        result: Result<RecordingHandle, String>,
    },
    ScreenRecordDone {
        outcome: OperationOutcome,
    },
    SettingChanged {
        kind: SettingKind,
        serial: String,
        outcome: OperationOutcome,
    },
    WifiConnectDone {
        outcome: OperationOutcome,
    },
    WifiDisconnectDone {
        outcome: OperationOutcome,
    },
    WifiPairDone {
        outcome: OperationOutcome,
    },
    EmulatorLaunched {
        name: String,
        outcome: OperationOutcome,
    },
    EmulatorConfigured {
        outcome: OperationOutcome,
    },

    /// Progress line streamed by a running operation
    LiveOutput {
        line: String,
    },
}
