//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    #[error("Failed to restore terminal: {0}")]
    TerminalRestore(String),

    // ─────────────────────────────────────────────────────────────
    // Device Bridge Errors
    // ─────────────────────────────────────────────────────────────
    #[error("adb not found at {path}. Set ANDROID_HOME or paths.android_home.")]
    BridgeNotFound { path: PathBuf },

    #[error("adb error: {message}")]
    Bridge { message: String },

    #[error("Failed to spawn process: {reason}")]
    ProcessSpawn { reason: String },

    /// A device operation failed; the message is already user-facing.
    #[error("{message}")]
    Operation { message: String },

    #[error("Could not parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Rejected user input; shown verbatim in the log panel.
    #[error("{message}")]
    Validation { message: String },

    // ─────────────────────────────────────────────────────────────
    // Output Capture Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Output capture error: {message}")]
    Capture { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn bridge(message: impl Into<String>) -> Self {
        Self::Bridge {
            message: message.into(),
        }
    }

    pub fn process_spawn(reason: impl Into<String>) -> Self {
        Self::ProcessSpawn {
            reason: reason.into(),
        }
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }

    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Bridge { .. }
                | Error::Operation { .. }
                | Error::Parse { .. }
                | Error::Validation { .. }
                | Error::Capture { .. }
                | Error::ChannelSend { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::TerminalInit(_) | Error::ConfigInvalid { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::bridge("device offline");
        assert_eq!(err.to_string(), "adb error: device offline");

        let err = Error::BridgeNotFound {
            path: PathBuf::from("/sdk/platform-tools/adb"),
        };
        assert!(err.to_string().contains("/sdk/platform-tools/adb"));
    }

    #[test]
    fn test_user_facing_variants_display_verbatim() {
        assert_eq!(
            Error::validation("invalid DPI value: abc").to_string(),
            "invalid DPI value: abc"
        );
        assert_eq!(
            Error::operation("failed to take screenshot").to_string(),
            "failed to take screenshot"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::TerminalInit("no tty".into()).is_fatal());
        assert!(!Error::bridge("test").is_fatal());
        assert!(!Error::capture("pipe").is_fatal());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::bridge("test").is_recoverable());
        assert!(Error::validation("bad").is_recoverable());
        assert!(Error::capture("already active").is_recoverable());
        assert!(!Error::TerminalInit("x".into()).is_recoverable());
    }

    #[test]
    fn test_parse_error_mentions_subject() {
        let err = Error::parse("DPI", "Physical density missing");
        assert_eq!(
            err.to_string(),
            "Could not parse DPI: Physical density missing"
        );
    }

    #[test]
    fn test_context_preserves_variant() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("reading avd ini").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
