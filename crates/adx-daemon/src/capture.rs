//! Output capture for device operations
//!
//! Operations report progress through [`stdout()`] / [`stderr()`] (or the
//! [`out`] / [`err`] helpers) instead of `println!`. While a capture is
//! active those handles write into two in-process pipes; a reader thread
//! per pipe splits the bytes into lines and pushes them into a bounded
//! queue. Without an active capture the handles forward to the real
//! process streams.
//!
//! The redirection target is one process-wide slot. Only one capture may
//! own it at a time; a second [`OutputCapture::start`] from another
//! instance fails with [`Error::Capture`] instead of stealing the output.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use adx_core::prelude::*;

/// Lines buffered per stream before new ones are dropped
pub const CAPTURE_QUEUE_CAPACITY: usize = 100;

/// Write-ends of the active capture, if any
static ROUTE: Mutex<Option<Route>> = Mutex::new(None);

struct Route {
    out: Sender<Vec<u8>>,
    err: Sender<Vec<u8>>,
}

fn route() -> MutexGuard<'static, Option<Route>> {
    ROUTE.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Out,
    Err,
}

/// Capture-aware handle to the primary or diagnostic output stream
#[derive(Debug, Clone, Copy)]
pub struct Output {
    stream: Stream,
}

/// Handle to the primary output stream
pub fn stdout() -> Output {
    Output {
        stream: Stream::Out,
    }
}

/// Handle to the diagnostic output stream
pub fn stderr() -> Output {
    Output {
        stream: Stream::Err,
    }
}

/// Print one line to the primary stream, ignoring write failures
pub fn out(line: impl AsRef<str>) {
    let _ = writeln!(stdout(), "{}", line.as_ref());
}

/// Print one line to the diagnostic stream, ignoring write failures
pub fn err(line: impl AsRef<str>) {
    let _ = writeln!(stderr(), "{}", line.as_ref());
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        {
            let guard = route();
            if let Some(route) = guard.as_ref() {
                let pipe = match self.stream {
                    Stream::Out => &route.out,
                    Stream::Err => &route.err,
                };
                if pipe.send(buf.to_vec()).is_ok() {
                    return Ok(buf.len());
                }
            }
        }

        match self.stream {
            Stream::Out => io::stdout().write(buf),
            Stream::Err => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if route().is_some() {
            return Ok(());
        }
        match self.stream {
            Stream::Out => io::stdout().flush(),
            Stream::Err => io::stderr().flush(),
        }
    }
}

#[derive(Default)]
struct CaptureState {
    active: bool,
    readers: Vec<JoinHandle<()>>,
    out_lines: Option<Receiver<String>>,
    err_lines: Option<Receiver<String>>,
}

/// One capture session over the process-wide output handles
///
/// Dropping an active capture stops it, so the redirection is released on
/// every exit path including unwinding.
#[derive(Default)]
pub struct OutputCapture {
    state: Mutex<CaptureState>,
}

impl OutputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CaptureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self) -> bool {
        self.state().active
    }

    /// Begin capturing. No-op when this instance is already capturing.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state();
        if state.active {
            return Ok(());
        }

        let mut slot = route();
        if slot.is_some() {
            return Err(Error::capture(
                "output is already being captured by another operation",
            ));
        }

        let (out_pipe, out_reader) = mpsc::channel::<Vec<u8>>();
        let (err_pipe, err_reader) = mpsc::channel::<Vec<u8>>();
        let (out_tx, out_rx) = mpsc::sync_channel::<String>(CAPTURE_QUEUE_CAPACITY);
        let (err_tx, err_rx) = mpsc::sync_channel::<String>(CAPTURE_QUEUE_CAPACITY);

        let out_handle = spawn_reader("adx-capture-out", out_reader, out_tx)?;
        // On failure here `out_pipe` drops with the early return, which ends
        // the first reader.
        let err_handle = spawn_reader("adx-capture-err", err_reader, err_tx)?;

        *slot = Some(Route {
            out: out_pipe,
            err: err_pipe,
        });

        state.active = true;
        state.readers = vec![out_handle, err_handle];
        state.out_lines = Some(out_rx);
        state.err_lines = Some(err_rx);

        trace!("output capture started");
        Ok(())
    }

    /// Stop capturing and wait for both readers to drain. No-op when idle.
    pub fn stop(&self) -> Result<()> {
        let mut state = self.state();
        if !state.active {
            return Ok(());
        }

        // Dropping the write-ends signals end-of-stream to the readers.
        route().take();
        state.active = false;

        let mut panicked = false;
        for handle in state.readers.drain(..) {
            if handle.join().is_err() {
                panicked = true;
            }
        }

        trace!("output capture stopped");
        if panicked {
            return Err(Error::capture("output reader thread panicked"));
        }
        Ok(())
    }

    /// Drain everything captured so far: primary lines, then diagnostic lines
    pub fn get_all_output(&self) -> Vec<String> {
        let state = self.state();
        let mut lines = Vec::new();
        for rx in [&state.out_lines, &state.err_lines].into_iter().flatten() {
            lines.extend(rx.try_iter());
        }
        lines
    }
}

impl Drop for OutputCapture {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("failed to stop output capture: {}", e);
        }
    }
}

fn spawn_reader(
    name: &str,
    pipe: Receiver<Vec<u8>>,
    lines: SyncSender<String>,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || read_lines(pipe, lines))
        .map_err(|e| Error::capture(format!("failed to start output reader: {e}")))
}

/// Split the byte stream into lines until every write-end is gone
fn read_lines(pipe: Receiver<Vec<u8>>, lines: SyncSender<String>) {
    let mut pending: Vec<u8> = Vec::new();

    for chunk in pipe {
        pending.extend_from_slice(&chunk);
        while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = pending.drain(..=pos).collect();
            push_line(&lines, &line);
        }
    }

    if !pending.is_empty() {
        push_line(&lines, &pending);
    }
}

fn push_line(lines: &SyncSender<String>, raw: &[u8]) {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches(['\n', '\r']);
    if text.is_empty() {
        return;
    }
    // Full queue: the line is dropped rather than blocking the writer.
    if let Err(TrySendError::Full(_)) = lines.try_send(text.to_string()) {
        trace!("capture queue full, dropping line");
    }
}

/// Lines captured while an operation ran, plus the operation's own result
#[derive(Debug)]
pub struct Captured<T, E> {
    pub lines: Vec<String>,
    pub result: std::result::Result<T, E>,
}

/// Run `operation` with output captured
///
/// The outer `Result` only fails for capture infrastructure problems, in
/// which case the operation does not run (start failure) or its result is
/// discarded (stop failure). The operation's own error is returned
/// untouched in [`Captured::result`].
///
/// Only text written through [`stdout()`], [`stderr()`], [`out`] or
/// [`err`] is collected. `println!`, `eprintln!` and child processes that
/// inherit the real stdio still reach the process file descriptors.
pub fn capture_function<T, E, F>(operation: F) -> Result<Captured<T, E>>
where
    F: FnOnce() -> std::result::Result<T, E>,
{
    let capture = OutputCapture::new();
    capture.start()?;

    // If `operation` panics, `capture` is dropped while unwinding and stops.
    let result = operation();

    capture.stop()?;
    let lines = capture.get_all_output();

    Ok(Captured { lines, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_capture_round_trip() {
        let captured = capture_function(|| {
            out("hello");
            out("world");
            Ok::<(), Error>(())
        })
        .unwrap();

        assert_eq!(captured.lines, vec!["hello", "world"]);
        assert!(captured.result.is_ok());
    }

    #[test]
    #[serial]
    fn test_operation_error_is_propagated_with_lines() {
        let captured = capture_function(|| {
            out("pulling file");
            Err::<(), _>("pull failed".to_string())
        })
        .unwrap();

        assert_eq!(captured.lines, vec!["pulling file"]);
        assert_eq!(captured.result.unwrap_err(), "pull failed");
    }

    #[test]
    #[serial]
    fn test_primary_lines_precede_diagnostic_lines() {
        let captured = capture_function(|| {
            err("warning first");
            out("info second");
            Ok::<(), Error>(())
        })
        .unwrap();

        assert_eq!(captured.lines, vec!["info second", "warning first"]);
    }

    #[test]
    #[serial]
    fn test_empty_lines_and_partial_writes() {
        let captured = capture_function(|| {
            let mut handle = stdout();
            handle.write_all(b"par")?;
            handle.write_all(b"tial\n\n\r\nlast")?;
            Ok::<(), io::Error>(())
        })
        .unwrap();

        assert_eq!(captured.lines, vec!["partial", "last"]);
    }

    #[test]
    #[serial]
    fn test_start_is_idempotent() {
        let capture = OutputCapture::new();
        capture.start().unwrap();
        capture.start().unwrap();
        assert!(capture.is_active());

        out("once");
        capture.stop().unwrap();
        assert_eq!(capture.get_all_output(), vec!["once"]);
    }

    #[test]
    #[serial]
    fn test_stop_without_start_is_noop() {
        let capture = OutputCapture::new();
        capture.stop().unwrap();
        capture.stop().unwrap();
        assert!(capture.get_all_output().is_empty());
    }

    #[test]
    #[serial]
    fn test_second_capture_is_rejected() {
        let first = OutputCapture::new();
        first.start().unwrap();

        let second = OutputCapture::new();
        let err = second.start().unwrap_err();
        assert!(matches!(err, Error::Capture { .. }));

        first.stop().unwrap();
        second.start().unwrap();
        second.stop().unwrap();
    }

    #[test]
    #[serial]
    fn test_queue_overflow_drops_lines() {
        let captured = capture_function(|| {
            for i in 0..(CAPTURE_QUEUE_CAPACITY + 50) {
                out(format!("line {i}"));
            }
            Ok::<(), Error>(())
        })
        .unwrap();

        assert_eq!(captured.lines.len(), CAPTURE_QUEUE_CAPACITY);
        assert_eq!(captured.lines[0], "line 0");
    }

    #[test]
    #[serial]
    fn test_drop_releases_redirection() {
        {
            let capture = OutputCapture::new();
            capture.start().unwrap();
        }
        let next = OutputCapture::new();
        next.start().unwrap();
        next.stop().unwrap();
    }

    #[test]
    #[serial]
    fn test_panicking_operation_releases_redirection() {
        let result = std::panic::catch_unwind(|| {
            let _ = capture_function(|| -> std::result::Result<(), Error> {
                panic!("operation blew up");
            });
        });
        assert!(result.is_err());

        let captured = capture_function(|| {
            out("after panic");
            Ok::<(), Error>(())
        })
        .unwrap();
        assert_eq!(captured.lines, vec!["after panic"]);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_inherited_child_output_is_not_captured() {
        let captured = capture_function(|| {
            out("before");
            let status = std::process::Command::new("echo").arg("from child").status()?;
            out("after");
            Ok::<_, io::Error>(status.success())
        })
        .unwrap();

        assert_eq!(captured.lines, vec!["before", "after"]);
        assert!(captured.result.unwrap());
    }
}
