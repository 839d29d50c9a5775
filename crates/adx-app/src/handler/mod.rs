//! Handler module - TEA update function and key handling
//!
//! - `update`: main update() function and message dispatch
//! - `keys`: key event to message translation per mode
//! - `commands`: what selecting a menu entry or submitting text starts

pub(crate) mod commands;
pub(crate) mod keys;
pub(crate) mod update;


use adx_daemon::{Avd, RecordingHandle, SettingKind};

use crate::message::{Message, RefreshReason};

pub use keys::handle_key;
pub use update::update;

/// Background work the event loop should start after an update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Enumerate connected devices
    LoadDevices { reason: RefreshReason },

    /// Read AVD descriptors from disk
    LoadAvds,

    /// Read the current value of a display setting
    LoadSetting {
        kind: SettingKind,
        serial: String,
        reload: bool,
    },

    TakeScreenshot { serial: String },

    TakeDayNightScreenshots { serial: String },

    StartRecording { serial: String },

    /// Interrupt, finalize and pull the active recording
    StopRecording { handle: RecordingHandle },

    /// Apply an already validated setting value
    ChangeSetting {
        kind: SettingKind,
        serial: String,
        value: String,
    },

    ConnectWifi { address: String },

    DisconnectWifi { address: String },

    PairWifi { address: String, code: String },

    /// Start the emulator and schedule a delayed device reload
    LaunchEmulator { avd: Avd },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
