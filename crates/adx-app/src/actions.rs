//! Action handlers: UpdateAction dispatch to background tasks

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use adx_core::prelude::*;
use adx_daemon::OpsContext;

use crate::config::Settings;
use crate::message::Message;
use crate::{spawn, UpdateAction};

/// Everything a background operation needs besides its own arguments
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub ops: OpsContext,
    /// Directory holding `<name>.ini` / `<name>.avd/`
    pub avd_home: PathBuf,
    /// Wait before the extra device reload after an emulator launch
    pub emulator_launch_delay: Duration,
}

impl ActionContext {
    pub fn new(ops: OpsContext, avd_home: impl Into<PathBuf>) -> Self {
        Self {
            ops,
            avd_home: avd_home.into(),
            emulator_launch_delay: Duration::from_secs(30),
        }
    }

    /// Build from loaded settings (SDK paths resolved once, here)
    pub fn from_settings(settings: &Settings) -> Self {
        let sdk = settings.sdk_paths();
        let ops = OpsContext::new(&sdk, settings.media_dir());
        Self {
            ops,
            avd_home: sdk.avd_home.clone(),
            emulator_launch_delay: settings.refresh.emulator_launch_delay(),
        }
    }

    pub fn with_emulator_launch_delay(mut self, delay: Duration) -> Self {
        self.emulator_launch_delay = delay;
        self
    }
}

/// Execute an action by spawning a background task
pub fn handle_action(action: UpdateAction, msg_tx: mpsc::Sender<Message>, ctx: &ActionContext) {
    debug!("dispatching {:?}", action);
    let ops = ctx.ops.clone();

    match action {
        UpdateAction::LoadDevices { reason } => spawn::spawn_device_load(msg_tx, ops, reason),

        UpdateAction::LoadAvds => spawn::spawn_avd_load(msg_tx, ctx.avd_home.clone()),

        UpdateAction::LoadSetting {
            kind,
            serial,
            reload,
        } => spawn::spawn_setting_load(msg_tx, ops, kind, serial, reload),

        UpdateAction::TakeScreenshot { serial } => spawn::spawn_screenshot(msg_tx, ops, serial),

        UpdateAction::TakeDayNightScreenshots { serial } => {
            spawn::spawn_day_night(msg_tx, ops, serial)
        }

        UpdateAction::StartRecording { serial } => {
            spawn::spawn_recording_start(msg_tx, ops, serial)
        }

        UpdateAction::StopRecording { handle } => {
            spawn::spawn_recording_stop(msg_tx, ops, handle)
        }

        UpdateAction::ChangeSetting {
            kind,
            serial,
            value,
        } => spawn::spawn_setting_change(msg_tx, ops, kind, serial, value),

        UpdateAction::ConnectWifi { address } => spawn::spawn_wifi_connect(msg_tx, ops, address),

        UpdateAction::DisconnectWifi { address } => {
            spawn::spawn_wifi_disconnect(msg_tx, ops, address)
        }

        UpdateAction::PairWifi { address, code } => {
            spawn::spawn_wifi_pair(msg_tx, ops, address, code)
        }

        UpdateAction::LaunchEmulator { avd } => {
            spawn::spawn_emulator_launch(msg_tx, ops, avd, ctx.emulator_launch_delay)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adx_daemon::SdkPaths;
    use tempfile::tempdir;

    fn test_context(root: &std::path::Path) -> ActionContext {
        let sdk = SdkPaths::from_home(root.join("sdk")).with_avd_home(root.join("avd"));
        ActionContext::new(OpsContext::new(&sdk, root.join("media")), root.join("avd"))
    }

    #[test]
    fn test_from_settings_uses_configured_paths() {
        let mut settings = Settings::default();
        settings.paths.android_home = Some(PathBuf::from("/opt/android-sdk"));
        settings.paths.media_dir = Some(PathBuf::from("/tmp/adx-media"));
        settings.refresh.emulator_launch_delay_secs = 12;

        let ctx = ActionContext::from_settings(&settings);

        assert_eq!(ctx.ops.media_dir, PathBuf::from("/tmp/adx-media"));
        assert_eq!(
            ctx.ops.emulator,
            PathBuf::from("/opt/android-sdk/emulator/emulator")
        );
        assert_eq!(ctx.emulator_launch_delay, Duration::from_secs(12));
    }

    #[tokio::test]
    async fn test_load_avds_reports_back() {
        let dir = tempdir().unwrap();
        let avd_home = dir.path().join("avd");
        std::fs::create_dir_all(avd_home.join("Pixel_7.avd")).unwrap();
        std::fs::write(avd_home.join("Pixel_7.ini"), "path=x\n").unwrap();

        let ctx = test_context(dir.path());
        let (tx, mut rx) = mpsc::channel(4);
        handle_action(UpdateAction::LoadAvds, tx, &ctx);

        match rx.recv().await.unwrap() {
            Message::AvdsLoaded { result } => {
                let avds = result.unwrap();
                assert_eq!(avds.len(), 1);
                assert_eq!(avds[0].name, "Pixel_7");
            }
            other => panic!("unexpected message {other:?}"),
        }
    }
}
