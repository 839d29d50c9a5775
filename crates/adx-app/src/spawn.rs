//! Background task spawning for device operations
//!
//! Every function here spawns a tokio task that runs one blocking
//! operation on the blocking pool and sends exactly one result message.
//! A panicking operation still produces a failure message.
//!
//! Operations that print progress run inside an output capture. The
//! capture redirects process-wide handles, so those runs are serialized
//! through [`CAPTURE_SLOT`].

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinError;

use adx_core::prelude::*;
use adx_daemon::{
    capture_function, devices, list_avds, media, shorten_home, wifi, Avd, Captured, OpsContext,
    RecordingHandle, ScreenRecording, SettingKind,
};

use crate::message::{Message, OperationOutcome, RefreshReason};
use crate::refresh;

/// At most one captured operation runs at a time
static CAPTURE_SLOT: Semaphore = Semaphore::const_new(1);

fn join_failure(e: JoinError) -> String {
    if e.is_panic() {
        "operation panicked".to_string()
    } else {
        "operation was cancelled".to_string()
    }
}

/// Run `op` on the blocking pool
async fn run_blocking<T, F>(op: F) -> std::result::Result<T, String>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(join_failure(e)),
    }
}

/// Run `op` on the blocking pool with its output captured
///
/// Waits for the capture slot first. Returns the operation result and
/// whatever it printed.
async fn run_captured<T, F>(op: F) -> (std::result::Result<T, String>, Vec<String>)
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let permit = match CAPTURE_SLOT.acquire().await {
        Ok(permit) => permit,
        Err(e) => return (Err(format!("capture unavailable: {e}")), Vec::new()),
    };

    let joined = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        capture_function(op)
    })
    .await;

    match joined {
        Ok(Ok(Captured { lines, result })) => (result.map_err(|e| e.to_string()), lines),
        Ok(Err(capture_error)) => {
            warn!("output capture failed: {}", capture_error);
            (Err(capture_error.to_string()), Vec::new())
        }
        Err(e) => (Err(join_failure(e)), Vec::new()),
    }
}

fn to_outcome<T>(
    result: std::result::Result<T, String>,
    captured: Vec<String>,
    success_text: impl FnOnce(T) -> String,
) -> OperationOutcome {
    match result {
        Ok(value) => OperationOutcome::success(success_text(value), captured),
        Err(e) => OperationOutcome::failure(e, captured),
    }
}

async fn send(msg_tx: &mpsc::Sender<Message>, message: Message) {
    if msg_tx.send(message).await.is_err() {
        debug!("controller inbox closed, dropping result");
    }
}

// ─────────────────────────────────────────────────────────
// Enumeration
// ─────────────────────────────────────────────────────────

/// Spawn `adb devices -l`
pub fn spawn_device_load(msg_tx: mpsc::Sender<Message>, ctx: OpsContext, reason: RefreshReason) {
    tokio::spawn(async move {
        let result = run_blocking(move || devices::list_devices(&ctx.adb)).await;
        send(&msg_tx, Message::DevicesLoaded { reason, result }).await;
    });
}

/// Spawn AVD discovery
pub fn spawn_avd_load(msg_tx: mpsc::Sender<Message>, avd_home: PathBuf) {
    tokio::spawn(async move {
        let result = run_blocking(move || list_avds(&avd_home)).await;
        send(&msg_tx, Message::AvdsLoaded { result }).await;
    });
}

/// Spawn a read of the current setting value
pub fn spawn_setting_load(
    msg_tx: mpsc::Sender<Message>,
    ctx: OpsContext,
    kind: SettingKind,
    serial: String,
    reload: bool,
) {
    tokio::spawn(async move {
        let result = run_blocking(move || kind.info(&ctx.adb, &serial)).await;
        send(
            &msg_tx,
            Message::SettingLoaded {
                kind,
                reload,
                result,
            },
        )
        .await;
    });
}

// ─────────────────────────────────────────────────────────
// Media
// ─────────────────────────────────────────────────────────

pub fn spawn_screenshot(msg_tx: mpsc::Sender<Message>, ctx: OpsContext, serial: String) {
    tokio::spawn(async move {
        let target = serial.clone();
        let (result, captured) =
            run_captured(move || media::take_screenshot(&ctx, &target)).await;
        let outcome = to_outcome(result, captured, |path| {
            format!("Screenshot captured on {serial}\n{}", shorten_home(&path))
        });
        send(&msg_tx, Message::ScreenshotDone { outcome }).await;
    });
}

/// Day-night pair; each step is streamed as [`Message::LiveOutput`]
pub fn spawn_day_night(msg_tx: mpsc::Sender<Message>, ctx: OpsContext, serial: String) {
    tokio::spawn(async move {
        let progress_tx = msg_tx.clone();
        let target = serial.clone();
        let result = run_blocking(move || {
            media::take_day_night_screenshots(&ctx, &target, |line| {
                // Blocking pool thread: blocking_send is safe here
                let _ = progress_tx.blocking_send(Message::LiveOutput { line });
            })
        })
        .await;

        let outcome = to_outcome(result, Vec::new(), |(day, night)| {
            format!(
                "Day-night screenshots captured on {serial}\n{}\n{}",
                shorten_home(&day),
                shorten_home(&night)
            )
        });
        send(&msg_tx, Message::DayNightDone { outcome }).await;
    });
}

pub fn spawn_recording_start(msg_tx: mpsc::Sender<Message>, ctx: OpsContext, serial: String) {
    tokio::spawn(async move {
        let target = serial.clone();
        let result = run_blocking(move || ScreenRecording::start(&ctx, &target))
            .await
            .map(RecordingHandle::new);
        send(&msg_tx, Message::RecordingStarted { serial, result }).await;
    });
}

/// Stop the recording held by `handle` and pull the file
pub fn spawn_recording_stop(
    msg_tx: mpsc::Sender<Message>,
    ctx: OpsContext,
    handle: RecordingHandle,
) {
    tokio::spawn(async move {
        let (result, captured) = run_captured(move || {
            let recording = handle
                .take()
                .ok_or_else(|| Error::operation("no active recording"))?;
            let serial = recording.serial.clone();
            let path = recording.stop_and_save(&ctx)?;
            Ok((serial, path))
        })
        .await;

        let outcome = to_outcome(result, captured, |(serial, path)| {
            format!("Screen recording saved on {serial}\n{}", shorten_home(&path))
        });
        send(&msg_tx, Message::ScreenRecordDone { outcome }).await;
    });
}

// ─────────────────────────────────────────────────────────
// Display settings
// ─────────────────────────────────────────────────────────

pub fn spawn_setting_change(
    msg_tx: mpsc::Sender<Message>,
    ctx: OpsContext,
    kind: SettingKind,
    serial: String,
    value: String,
) {
    tokio::spawn(async move {
        let target = serial.clone();
        let (result, captured) =
            run_captured(move || kind.apply(&ctx.adb, &target, &value)).await;
        let outcome = to_outcome(result, captured, |applied| {
            format!("{} changed to {applied} on {serial}", kind.display_name())
        });
        send(
            &msg_tx,
            Message::SettingChanged {
                kind,
                serial,
                outcome,
            },
        )
        .await;
    });
}

// ─────────────────────────────────────────────────────────
// WiFi
// ─────────────────────────────────────────────────────────

pub fn spawn_wifi_connect(msg_tx: mpsc::Sender<Message>, ctx: OpsContext, address: String) {
    tokio::spawn(async move {
        let (result, captured) = run_captured(move || wifi::connect(&ctx, &address)).await;
        let outcome = to_outcome(result, captured, |final_address| {
            format!("WiFi device connected: {final_address}")
        });
        send(&msg_tx, Message::WifiConnectDone { outcome }).await;
    });
}

pub fn spawn_wifi_disconnect(msg_tx: mpsc::Sender<Message>, ctx: OpsContext, address: String) {
    tokio::spawn(async move {
        let (result, captured) = run_captured(move || wifi::disconnect(&ctx, &address)).await;
        let outcome = to_outcome(result, captured, |address| {
            format!("WiFi device disconnected: {address}")
        });
        send(&msg_tx, Message::WifiDisconnectDone { outcome }).await;
    });
}

pub fn spawn_wifi_pair(
    msg_tx: mpsc::Sender<Message>,
    ctx: OpsContext,
    address: String,
    code: String,
) {
    tokio::spawn(async move {
        let target = address.clone();
        let (result, captured) = run_captured(move || wifi::pair(&ctx, &target, &code)).await;
        let outcome = to_outcome(result, captured, |()| {
            format!("WiFi device paired and connected: {address}")
        });
        send(&msg_tx, Message::WifiPairDone { outcome }).await;
    });
}

// ─────────────────────────────────────────────────────────
// Emulators
// ─────────────────────────────────────────────────────────

/// Launch `avd`; on success a device reload follows after `refresh_delay`
pub fn spawn_emulator_launch(
    msg_tx: mpsc::Sender<Message>,
    ctx: OpsContext,
    avd: Avd,
    refresh_delay: Duration,
) {
    tokio::spawn(async move {
        let name = avd.name.clone();
        let result = run_blocking(move || adx_daemon::launch_avd(&ctx.emulator, &avd)).await;

        if result.is_ok() {
            refresh::spawn_delayed_refresh(
                msg_tx.clone(),
                refresh_delay,
                RefreshReason::EmulatorLaunch,
            );
        }

        let launched = name.clone();
        let outcome = to_outcome(result, Vec::new(), |_pid| {
            format!("Launched emulator: {launched} (may take a moment to appear)")
        });
        send(&msg_tx, Message::EmulatorLaunched { name, outcome }).await;
    });
}
