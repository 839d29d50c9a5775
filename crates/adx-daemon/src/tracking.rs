//! Device-change watcher over `adb track-devices`
//!
//! The bridge keeps the subprocess open and prints one `SERIAL<TAB>STATUS`
//! line per transition. [`DeviceTracker`] owns that subprocess on a tokio
//! task and forwards parsed [`DeviceChange`] events on a bounded channel.
//! Unparseable lines are skipped. When the stream ends (or the tracker is
//! stopped) the child is killed and the channel closes; restarting is up
//! to the caller.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{mpsc, oneshot};

use adx_core::prelude::*;

/// Capacity of the event channel
pub const CHANGE_CHANNEL_CAPACITY: usize = 10;

/// Default time a send may wait for room in the channel
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 100;

/// Device state reported by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    Device,
    Offline,
    Disconnected,
}

impl DeviceStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "device" => Some(DeviceStatus::Device),
            "offline" => Some(DeviceStatus::Offline),
            "disconnected" => Some(DeviceStatus::Disconnected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Device => "device",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attach/detach/offline transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceChange {
    pub serial: String,
    pub status: DeviceStatus,
}

/// Parse one `SERIAL<TAB>STATUS` line
///
/// Returns `None` for lines without a tab, with an empty serial or with an
/// unrecognized status.
pub fn parse_track_line(line: &str) -> Option<DeviceChange> {
    let mut parts = line.trim().split('\t');
    let serial = parts.next()?.trim();
    let status = parts.next()?.trim();

    if serial.is_empty() {
        return None;
    }

    Some(DeviceChange {
        serial: serial.to_string(),
        status: DeviceStatus::parse(status)?,
    })
}

/// Tracker settings
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub adb: PathBuf,
    /// How long a send may wait for room before the event is dropped
    pub send_timeout: Duration,
}

impl TrackerConfig {
    pub fn new(adb: impl Into<PathBuf>) -> Self {
        Self {
            adb: adb.into(),
            send_timeout: Duration::from_millis(DEFAULT_SEND_TIMEOUT_MS),
        }
    }

    pub fn with_send_timeout_ms(mut self, ms: u64) -> Self {
        self.send_timeout = Duration::from_millis(ms);
        self
    }
}

/// Owns the `adb track-devices` subprocess
pub struct DeviceTracker {
    config: TrackerConfig,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl DeviceTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            stop_tx: None,
        }
    }

    /// Spawn the subprocess and its reading task
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(&mut self) -> Result<mpsc::Receiver<DeviceChange>> {
        if self.is_running() {
            return Err(Error::process_spawn("device tracker is already running"));
        }

        let mut child = Command::new(&self.config.adb)
            .arg("track-devices")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::BridgeNotFound {
                        path: self.config.adb.clone(),
                    }
                } else {
                    Error::process_spawn(format!("adb track-devices: {e}"))
                }
            })?;

        let Some(stdout) = child.stdout.take() else {
            return Err(Error::process_spawn("adb track-devices has no stdout"));
        };

        info!("device tracker started (pid {:?})", child.id());

        let (tx, rx) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);

        let send_timeout = self.config.send_timeout;
        tokio::spawn(async move {
            let _guard = ChildGuard(child);
            forward_changes(BufReader::new(stdout), tx, send_timeout, stop_rx).await;
            debug!("device tracker loop ended");
        });

        Ok(rx)
    }

    /// Ask the reading task to exit; the child is killed on its way out
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

impl Drop for DeviceTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Kills the tracked child on every exit path of the reading task
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.start_kill() {
            trace!("track-devices already exited: {}", e);
        }
    }
}

/// Read lines until EOF, a read error, a closed receiver or a stop request
async fn forward_changes<R>(
    reader: R,
    tx: mpsc::Sender<DeviceChange>,
    send_timeout: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = tokio::select! {
            _ = &mut stop_rx => break,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                debug!("device tracker read error: {}", e);
                break;
            }
        };

        let Some(change) = parse_track_line(&line) else {
            trace!("ignoring track-devices line: {:?}", line);
            continue;
        };

        match tx.send_timeout(change, send_timeout).await {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(change)) => {
                trace!("device change queue full, dropping {:?}", change);
            }
            Err(SendTimeoutError::Closed(_)) => break,
        }
    }
}
