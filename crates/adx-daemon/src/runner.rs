//! Command runner seam and the `adb` client built on it
//!
//! Every device operation goes through [`Adb`], which goes through a
//! [`CommandRunner`]. Production uses [`SystemRunner`]; tests swap in a
//! mock so no real bridge is needed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use adx_core::prelude::*;

/// Exit status and output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}{}", self.stdout, self.stderr)
        }
    }

    /// Convenience constructor for a successful run
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Convenience constructor for a failed run
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs an external program to completion
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn output(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        trace!("exec: {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::BridgeNotFound {
                        path: program.to_path_buf(),
                    }
                } else {
                    Error::process_spawn(format!("{}: {}", program.display(), e))
                }
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Client for the `adb` executable
#[derive(Clone)]
pub struct Adb {
    path: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for Adb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adb").field("path", &self.path).finish()
    }
}

impl Adb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_runner(path, Arc::new(SystemRunner))
    }

    pub fn with_runner(path: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `adb [-s SERIAL] ARGS...` and return the raw result
    pub fn output(&self, serial: Option<&str>, args: &[&str]) -> Result<CommandOutput> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(serial) = serial {
            full.push("-s".to_string());
            full.push(serial.to_string());
        }
        full.extend(args.iter().map(|a| a.to_string()));
        self.runner.output(&self.path, &full)
    }

    /// Like [`Adb::output`] but a non-zero exit becomes [`Error::Bridge`]
    ///
    /// Returns combined stdout/stderr on success.
    pub fn run(&self, serial: Option<&str>, args: &[&str]) -> Result<String> {
        let output = self.output(serial, args)?;
        if output.success() {
            return Ok(output.combined());
        }

        let text = output.combined();
        let text = text.trim();
        let code = output
            .code
            .map(|c| format!("exit status {c}"))
            .unwrap_or_else(|| "terminated by signal".to_string());
        Err(Error::bridge(if text.is_empty() {
            format!("adb {} failed: {}", args.join(" "), code)
        } else {
            format!("adb {} failed: {} ({})", args.join(" "), text, code)
        }))
    }

    /// `adb -s SERIAL shell ARGS...`
    pub fn shell(&self, serial: &str, args: &[&str]) -> Result<String> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push("shell");
        full.extend_from_slice(args);
        self.run(Some(serial), &full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_serial_prefix() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .with(always(), eq(argv(&["-s", "emulator-5554", "shell", "wm", "size"])))
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok("Physical size: 1080x1920\n")));

        let adb = Adb::with_runner("/sdk/platform-tools/adb", Arc::new(runner));
        let out = adb.shell("emulator-5554", &["wm", "size"]).unwrap();
        assert_eq!(out, "Physical size: 1080x1920\n");
    }

    #[test]
    fn test_global_command_has_no_serial() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .with(always(), eq(argv(&["connect", "10.0.0.2:4444"])))
            .returning(|_, _| Ok(CommandOutput::ok("connected to 10.0.0.2:4444\n")));

        let adb = Adb::with_runner("adb", Arc::new(runner));
        assert!(adb
            .run(None, &["connect", "10.0.0.2:4444"])
            .unwrap()
            .contains("connected to"));
    }

    #[test]
    fn test_non_zero_exit_is_bridge_error() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .returning(|_, _| Ok(CommandOutput::failed(1, "error: device offline\n")));

        let adb = Adb::with_runner("adb", Arc::new(runner));
        let err = adb.shell("abc", &["screencap", "/sdcard/x.png"]).unwrap_err();
        let text = err.to_string();
        assert!(matches!(err, Error::Bridge { .. }));
        assert!(text.contains("error: device offline"));
        assert!(text.contains("exit status 1"));
    }

    #[test]
    fn test_combined_output() {
        let out = CommandOutput {
            code: Some(0),
            stdout: "a\n".into(),
            stderr: "b\n".into(),
        };
        assert_eq!(out.combined(), "a\nb\n");
        assert!(out.success());
        assert!(!CommandOutput::failed(2, "").success());
    }

    #[test]
    fn test_missing_program_maps_to_bridge_not_found() {
        let err = SystemRunner
            .output(Path::new("/nonexistent/adx-test/adb"), &[])
            .unwrap_err();
        assert!(matches!(err, Error::BridgeNotFound { .. }));
    }
}
