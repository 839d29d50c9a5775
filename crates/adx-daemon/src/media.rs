//! Screenshots and screen recordings
//!
//! Files land in the media directory with timestamped names:
//! `android-img-YYYY-MM-DD_HH-MM-SS.png` and `android-vid-...mp4`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, PoisonError};

use adx_core::prelude::*;

use crate::capture;
use crate::context::{pause, OpsContext};

/// Scratch location for screenshots on the device
pub const REMOTE_SCREENSHOT: &str = "/sdcard/screenshot.png";

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Replace the home directory prefix with `~`
pub fn shorten_home(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return Path::new("~").join(rest).display().to_string();
        }
    }
    path.display().to_string()
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        Error::operation(format!(
            "failed to create local directory {}: {e}",
            dir.display()
        ))
    })
}

/// `screencap` to the scratch file and pull it to `local`
fn capture_to(ctx: &OpsContext, serial: &str, local: &Path, label: &str) -> Result<()> {
    let local = local.to_string_lossy();

    ctx.adb
        .shell(serial, &["screencap", REMOTE_SCREENSHOT])
        .map_err(|e| Error::operation(format!("failed to take {label}: {e}")))?;

    ctx.adb
        .run(Some(serial), &["pull", REMOTE_SCREENSHOT, &local])
        .map_err(|e| Error::operation(format!("failed to pull {label}: {e}")))?;

    Ok(())
}

fn remove_remote(ctx: &OpsContext, serial: &str, remote: &str) {
    if let Err(e) = ctx.adb.shell(serial, &["rm", remote]) {
        debug!("failed to remove {} on {}: {}", remote, serial, e);
    }
}

/// Take one screenshot, returning the local file
pub fn take_screenshot(ctx: &OpsContext, serial: &str) -> Result<PathBuf> {
    ensure_dir(&ctx.media_dir)?;
    let local = ctx
        .media_dir
        .join(format!("android-img-{}.png", timestamp()));

    capture_to(ctx, serial, &local, "screenshot")?;
    remove_remote(ctx, serial, REMOTE_SCREENSHOT);

    capture::out(format!("Screenshot saved to: {}", local.display()));
    Ok(local)
}

fn set_night_mode(ctx: &OpsContext, serial: &str, enabled: bool) -> Result<()> {
    let mode = if enabled { "yes" } else { "no" };
    ctx.adb
        .shell(serial, &["cmd", "uimode", "night", mode])
        .map(|_| ())
}

/// Screenshot in light mode, then in dark mode, then restore light mode
///
/// Every step is reported through `progress` as it happens. Failing to
/// restore light mode is only a warning.
pub fn take_day_night_screenshots(
    ctx: &OpsContext,
    serial: &str,
    mut progress: impl FnMut(String),
) -> Result<(PathBuf, PathBuf)> {
    ensure_dir(&ctx.media_dir)?;
    let stamp = timestamp();
    let day = ctx.media_dir.join(format!("android-img-{stamp}-day.png"));
    let night = ctx.media_dir.join(format!("android-img-{stamp}-night.png"));

    progress(format!("Taking day and night screenshots of {serial}"));

    progress("Setting light mode...".to_string());
    set_night_mode(ctx, serial, false)
        .map_err(|e| Error::operation(format!("failed to set light mode: {e}")))?;
    pause(ctx.delays.ui_settle);

    progress("Taking day screenshot...".to_string());
    capture_to(ctx, serial, &day, "day screenshot")?;
    progress(format!("Day screenshot saved to: {}", day.display()));

    progress("Setting dark mode...".to_string());
    set_night_mode(ctx, serial, true)
        .map_err(|e| Error::operation(format!("failed to set dark mode: {e}")))?;
    pause(ctx.delays.ui_settle);

    progress("Taking night screenshot...".to_string());
    capture_to(ctx, serial, &night, "night screenshot")?;
    progress(format!("Night screenshot saved to: {}", night.display()));

    progress("Restoring light mode...".to_string());
    pause(ctx.delays.ui_settle);
    if let Err(e) = set_night_mode(ctx, serial, false) {
        progress(format!("Warning: failed to restore light mode: {e}"));
    }

    remove_remote(ctx, serial, REMOTE_SCREENSHOT);
    Ok((day, night))
}

/// An in-flight `adb shell screenrecord`
///
/// Dropping a recording that was never saved kills the local bridge
/// process; the partial file stays on the device.
pub struct ScreenRecording {
    pub serial: String,
    pub local_path: PathBuf,
    pub remote_path: String,
    child: Option<Child>,
}

impl fmt::Debug for ScreenRecording {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenRecording")
            .field("serial", &self.serial)
            .field("local_path", &self.local_path)
            .field("remote_path", &self.remote_path)
            .field("pid", &self.child.as_ref().map(Child::id))
            .finish()
    }
}

impl ScreenRecording {
    /// Start recording on `serial`
    pub fn start(ctx: &OpsContext, serial: &str) -> Result<Self> {
        let stamp = timestamp();
        let local_path = ctx.media_dir.join(format!("android-vid-{stamp}.mp4"));
        let remote_path = format!("/sdcard/screenrecord_{stamp}.mp4");

        let child = Command::new(ctx.adb.path())
            .args(["-s", serial, "shell", "screenrecord", &remote_path])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::process_spawn(format!("screenrecord on {serial}: {e}")))?;

        info!("recording {} to {} (pid {})", serial, remote_path, child.id());

        Ok(Self {
            serial: serial.to_string(),
            local_path,
            remote_path,
            child: Some(child),
        })
    }

    /// Stop gracefully, wait for the device to finalize the file, then pull it
    pub fn stop_and_save(mut self, ctx: &OpsContext) -> Result<PathBuf> {
        if let Some(mut child) = self.child.take() {
            interrupt(&mut child)?;
            if let Err(e) = child.wait() {
                warn!("failed to wait for screenrecord: {}", e);
            }
        }

        pause(ctx.delays.recording_finalize);
        save_recording(ctx, &self.serial, &self.remote_path, &self.local_path)?;
        Ok(self.local_path.clone())
    }
}

impl Drop for ScreenRecording {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!("discarding recording on {}", self.serial);
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Ask the local bridge process to end the recording cleanly
///
/// `screenrecord` only writes a playable file when interrupted, not killed.
#[cfg(unix)]
fn interrupt(child: &mut Child) -> Result<()> {
    let pid = libc::pid_t::try_from(child.id())
        .map_err(|_| Error::operation("failed to stop recording: pid out of range"))?;

    // SAFETY: plain integer arguments; errno is read right after the call.
    let rc = unsafe { libc::kill(pid, libc::SIGINT) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        return Err(Error::operation(format!("failed to stop recording: {err}")));
    }
    Ok(())
}

#[cfg(not(unix))]
fn interrupt(child: &mut Child) -> Result<()> {
    child
        .kill()
        .map_err(|e| Error::operation(format!("failed to stop recording: {e}")))
}

/// Verify, pull (retrying without `-s`) and clean up a finished recording
pub fn save_recording(
    ctx: &OpsContext,
    serial: &str,
    remote_path: &str,
    local_path: &Path,
) -> Result<()> {
    let listing = ctx.adb.output(Some(serial), &["shell", "ls", "-la", remote_path])?;
    if !listing.success() {
        return Err(Error::operation(format!(
            "recording file not found on device: {}",
            listing.combined().trim()
        )));
    }
    capture::out(format!("File on device: {}", listing.combined().trim()));

    if let Some(dir) = local_path.parent() {
        ensure_dir(dir)?;
    }

    let local = local_path.to_string_lossy();
    if let Err(first) = ctx.adb.run(Some(serial), &["pull", remote_path, &local]) {
        capture::out(format!("Pull attempt 1 failed: {first}"));
        if let Err(second) = ctx.adb.run(None, &["pull", remote_path, &local]) {
            capture::out(format!("Pull attempt 2 failed: {second}"));
            return Err(Error::operation(format!(
                "both pull attempts failed. First: {first}, Second: {second}"
            )));
        }
    }

    remove_remote(ctx, serial, remote_path);
    capture::out(format!("Screen recording saved to: {}", local_path.display()));
    Ok(())
}

/// Cloneable slot holding the active recording
///
/// Lets the recording travel inside messages; whoever stops it takes it out.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandle(Arc<Mutex<Option<ScreenRecording>>>);

impl RecordingHandle {
    pub fn new(recording: ScreenRecording) -> Self {
        Self(Arc::new(Mutex::new(Some(recording))))
    }

    pub fn take(&self) -> Option<ScreenRecording> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn serial(&self) -> Option<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|r| r.serial.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Delays;
    use crate::runner::{Adb, CommandOutput, MockCommandRunner};
    use mockall::Sequence;
    use serial_test::serial;
    use tempfile::tempdir;

    fn ctx_with(runner: MockCommandRunner, media: &Path) -> OpsContext {
        OpsContext {
            adb: Adb::with_runner("adb", Arc::new(runner)),
            emulator: PathBuf::from("emulator"),
            media_dir: media.to_path_buf(),
            delays: Delays::none(),
        }
    }

    fn starts_with(args: &[String], prefix: &[&str]) -> bool {
        args.len() >= prefix.len() && args.iter().zip(prefix).all(|(a, p)| a == p)
    }

    #[test]
    #[serial]
    fn test_screenshot_runs_capture_pull_rm() {
        let media = tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        let mut seq = Sequence::new();

        runner
            .expect_output()
            .withf(|_, a| starts_with(a, &["-s", "abc", "shell", "screencap", REMOTE_SCREENSHOT]))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::ok("")));
        runner
            .expect_output()
            .withf(|_, a| starts_with(a, &["-s", "abc", "pull", REMOTE_SCREENSHOT]))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::ok("1 file pulled")));
        runner
            .expect_output()
            .withf(|_, a| starts_with(a, &["-s", "abc", "shell", "rm"]))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::ok("")));

        let ctx = ctx_with(runner, media.path());
        let path = take_screenshot(&ctx, "abc").unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("android-img-"));
        assert!(name.ends_with(".png"));
        assert_eq!(path.parent().unwrap(), media.path());
    }

    #[test]
    #[serial]
    fn test_screenshot_failure_names_step() {
        let media = tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .returning(|_, _| Ok(CommandOutput::failed(1, "error: device 'abc' not found")));

        let ctx = ctx_with(runner, media.path());
        let err = take_screenshot(&ctx, "abc").unwrap_err();
        assert!(err.to_string().starts_with("failed to take screenshot"));
        assert!(err.to_string().contains("device 'abc' not found"));
    }

    #[test]
    #[serial]
    fn test_day_night_reports_progress() {
        let media = tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .returning(|_, _| Ok(CommandOutput::ok("")));

        let ctx = ctx_with(runner, media.path());
        let mut lines = Vec::new();
        let (day, night) =
            take_day_night_screenshots(&ctx, "emulator-5554", |l| lines.push(l)).unwrap();

        assert!(day.to_string_lossy().ends_with("-day.png"));
        assert!(night.to_string_lossy().ends_with("-night.png"));
        assert_eq!(lines[0], "Taking day and night screenshots of emulator-5554");
        assert_eq!(lines[1], "Setting light mode...");
        assert_eq!(lines.last().unwrap(), "Restoring light mode...");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    #[serial]
    fn test_day_night_restore_failure_is_warning() {
        let media = tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        let mut seq = Sequence::new();
        // night no, screencap, pull, night yes, screencap, pull
        runner
            .expect_output()
            .times(6)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::ok("")));
        runner
            .expect_output()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::failed(255, "cmd: Can't find service: uimode")));
        runner
            .expect_output()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CommandOutput::ok("")));

        let ctx = ctx_with(runner, media.path());
        let mut lines = Vec::new();
        take_day_night_screenshots(&ctx, "abc", |l| lines.push(l)).unwrap();

        assert!(lines
            .last()
            .unwrap()
            .starts_with("Warning: failed to restore light mode"));
    }

    #[test]
    #[serial]
    fn test_save_recording_retries_pull_without_serial() {
        let media = tempdir().unwrap();
        let local = media.path().join("videos").join("android-vid-x.mp4");
        let mut runner = MockCommandRunner::new();

        runner
            .expect_output()
            .withf(|_, a| starts_with(a, &["-s", "abc", "shell", "ls", "-la"]))
            .returning(|_, _| Ok(CommandOutput::ok("-rw-rw---- 1 root 1234 /sdcard/r.mp4\n")));
        runner
            .expect_output()
            .withf(|_, a| starts_with(a, &["-s", "abc", "pull"]))
            .times(1)
            .returning(|_, _| Ok(CommandOutput::failed(1, "protocol fault")));
        runner
            .expect_output()
            .withf(|_, a| starts_with(a, &["pull", "/sdcard/r.mp4"]))
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok("1 file pulled")));
        runner
            .expect_output()
            .withf(|_, a| starts_with(a, &["-s", "abc", "shell", "rm"]))
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok("")));

        let ctx = ctx_with(runner, media.path());
        save_recording(&ctx, "abc", "/sdcard/r.mp4", &local).unwrap();
        assert!(local.parent().unwrap().is_dir());
    }

    #[test]
    #[serial]
    fn test_save_recording_missing_remote_file() {
        let media = tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .returning(|_, _| Ok(CommandOutput::failed(1, "ls: /sdcard/r.mp4: No such file")));

        let ctx = ctx_with(runner, media.path());
        let err = save_recording(&ctx, "abc", "/sdcard/r.mp4", &media.path().join("v.mp4"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "recording file not found on device: ls: /sdcard/r.mp4: No such file"
        );
    }

    #[test]
    #[serial]
    fn test_save_recording_both_pulls_fail() {
        let media = tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .withf(|_, a| a.contains(&"ls".to_string()))
            .returning(|_, _| Ok(CommandOutput::ok("file")));
        runner
            .expect_output()
            .withf(|_, a| a.contains(&"pull".to_string()))
            .times(2)
            .returning(|_, _| Ok(CommandOutput::failed(1, "no space left")));

        let ctx = ctx_with(runner, media.path());
        let err = save_recording(&ctx, "abc", "/sdcard/r.mp4", &media.path().join("v.mp4"))
            .unwrap_err();
        assert!(err.to_string().starts_with("both pull attempts failed"));
    }

    #[test]
    fn test_shorten_home() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join("Downloads").join("a.png");
            assert_eq!(shorten_home(&path), "~/Downloads/a.png");
        }
        assert_eq!(shorten_home(Path::new("/opt/x.png")), "/opt/x.png");
    }

    #[test]
    fn test_empty_recording_handle() {
        let handle = RecordingHandle::default();
        assert!(handle.take().is_none());
        assert!(handle.serial().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_interrupt_delivers_sigint() {
        use std::os::unix::process::ExitStatusExt;

        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        interrupt(&mut child).unwrap();

        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(libc::SIGINT));
    }
}
