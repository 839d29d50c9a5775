//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

const LOG_ENV: &str = "ADX_LOG";
const LOG_FILE_PREFIX: &str = "adx.log";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/adx/logs/` (or the platform
/// equivalent). The terminal belongs to the TUI, so nothing is ever
/// printed to stdout or stderr from here.
///
/// Level resolution: `level_override` (from `--log-level`), then `ADX_LOG`,
/// then `info` for adx crates and `warn` for everything else.
///
/// # Examples
/// ```bash
/// ADX_LOG=debug adx
/// ADX_LOG=adx_daemon=trace adx
/// ```
pub fn init(level_override: Option<&str>) -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let env_filter = match level_override {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
            EnvFilter::new("adx=info,adx_core=info,adx_daemon=info,adx_app=info,adx_tui=info,warn")
        }),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("───────────────────────────────────────────────────────");
    tracing::info!("adx {} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("───────────────────────────────────────────────────────");

    Ok(())
}

/// Directory that holds the rolling log files
pub fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("adx").join("logs")
}

/// Path of today's log file
pub fn log_file() -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    log_directory().join(format!("{LOG_FILE_PREFIX}.{today}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_lives_in_log_directory() {
        let file = log_file();
        assert_eq!(file.parent(), Some(log_directory().as_path()));
        let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with("adx.log."));
    }
}
