//! Opening AVD configuration files in the user's editor.
//!
//! The editor takes over the terminal, so the controller only records an
//! [`EditorRequest`]; the TUI runner suspends its screen, calls
//! [`open_in_editor`] and feeds the result back as a message.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::message::OperationOutcome;

/// Editor used when neither the config nor `$EDITOR` names one
pub const DEFAULT_EDITOR: &str = "vi";

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur when editing a config file.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("AVD config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Editor could not be started
    #[error("Failed to open editor: {0}")]
    ExecutionFailed(#[from] std::io::Error),

    /// Editor ran but reported failure
    #[error("Failed to open editor: {0}")]
    Exited(String),

    #[error("Failed to open editor: editor command is empty")]
    EmptyCommand,
}

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

/// A pending "edit this AVD's config.ini"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRequest {
    pub avd_name: String,
    pub config_path: PathBuf,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

/// Pick the editor command: config override, then `$EDITOR`, then `vi`
pub fn resolve_editor(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var("EDITOR")
                .ok()
                .filter(|e| !e.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Build the command line; `editor` may carry arguments (`code --wait`)
pub fn editor_command(editor: &str, file: &Path) -> Result<Command, EditorError> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or(EditorError::EmptyCommand)?;

    let mut cmd = Command::new(program);
    cmd.args(parts).arg(file);
    Ok(cmd)
}

/// Run the editor on the request's file and wait for it to exit
pub fn open_in_editor(request: &EditorRequest, editor: &str) -> Result<(), EditorError> {
    if !request.config_path.is_file() {
        return Err(EditorError::FileNotFound(request.config_path.clone()));
    }

    let status = editor_command(editor, &request.config_path)?.status()?;
    if !status.success() {
        return Err(EditorError::Exited(format!("{editor} exited with {status}")));
    }

    tracing::info!("edited {} for {}", request.config_path.display(), request.avd_name);
    Ok(())
}

/// Outcome message for the log
pub fn outcome(result: Result<(), EditorError>) -> OperationOutcome {
    match result {
        Ok(()) => OperationOutcome::success("Emulator configuration updated", Vec::new()),
        Err(e) => OperationOutcome::failure(e.to_string(), Vec::new()),
    }
}
