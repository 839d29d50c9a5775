//! Background producers of `RefreshDevices` messages
//!
//! Three sources keep the device list current without user input: a
//! periodic timer, the `adb track-devices` watcher and the one-shot
//! delay after an emulator launch. Each only sends a message; the reload
//! itself goes through the normal update path.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use adx_core::prelude::*;
use adx_daemon::{DeviceChange, DeviceTracker, TrackerConfig};

use crate::message::{Message, RefreshReason};

/// Send `RefreshDevices { Periodic }` every `interval`
///
/// The first tick fires one full interval after start; the startup load
/// is requested separately. Ends when the controller inbox closes.
pub fn spawn_periodic_refresh(msg_tx: mpsc::Sender<Message>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let msg = Message::RefreshDevices {
                reason: RefreshReason::Periodic,
            };
            if msg_tx.send(msg).await.is_err() {
                debug!("periodic refresh stopped: inbox closed");
                break;
            }
        }
    })
}

/// Send one `RefreshDevices` after `delay`
pub fn spawn_delayed_refresh(
    msg_tx: mpsc::Sender<Message>,
    delay: Duration,
    reason: RefreshReason,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = msg_tx.send(Message::RefreshDevices { reason }).await;
    })
}

/// Run the device watcher for the lifetime of the returned task
///
/// A watcher that cannot start is logged and the task ends; periodic
/// refresh still covers device changes in that case.
pub fn spawn_device_watcher(
    msg_tx: mpsc::Sender<Message>,
    config: TrackerConfig,
    settle: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tracker = DeviceTracker::new(config);
        let changes = match tracker.start() {
            Ok(rx) => rx,
            Err(e) => {
                warn!("device watcher unavailable: {}", e);
                return;
            }
        };

        consume_changes(changes, msg_tx, settle).await;
        tracker.stop();
    })
}

/// Turn bursts of device changes into single reload requests
///
/// After the first change of a burst, waits `settle` for the device to
/// finish coming up, then discards whatever else queued meanwhile.
pub async fn consume_changes(
    mut changes: mpsc::Receiver<DeviceChange>,
    msg_tx: mpsc::Sender<Message>,
    settle: Duration,
) {
    while let Some(change) = changes.recv().await {
        debug!("device {} is now {}", change.serial, change.status.as_str());
        tokio::time::sleep(settle).await;

        let mut coalesced = 0usize;
        while changes.try_recv().is_ok() {
            coalesced += 1;
        }
        if coalesced > 0 {
            trace!("coalesced {} further device changes", coalesced);
        }

        let msg = Message::RefreshDevices {
            reason: RefreshReason::DeviceChange,
        };
        if msg_tx.send(msg).await.is_err() {
            debug!("device watcher stopped: inbox closed");
            return;
        }
    }
    warn!("device watcher stream ended");
}
