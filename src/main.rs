//! adx - interactive terminal front end for adb and the Android emulator
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use adx_app::config::{self, Settings};
use adx_app::ActionContext;
use adx_core::prelude::*;
use adx_daemon::{count_by_type, list_devices};
use clap::{Parser, Subcommand};

/// adx - everyday adb and emulator tasks from one searchable menu
#[derive(Parser, Debug)]
#[command(name = "adx", version)]
#[command(about = "Interactive terminal front end for adb and the Android emulator", long_about = None)]
struct Args {
    /// Log filter, e.g. `debug` or `adx_daemon=trace` (overrides ADX_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Directory for screenshots and recordings
    #[arg(long, value_name = "DIR")]
    media_dir: Option<PathBuf>,

    /// Android SDK root (overrides ANDROID_HOME and the config file)
    #[arg(long, value_name = "DIR")]
    android_home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print connected devices and exit
    Devices,
}

impl Args {
    /// Command-line paths win over the config file
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.media_dir {
            settings.paths.media_dir = Some(dir.clone());
        }
        if let Some(home) = &self.android_home {
            settings.paths.android_home = Some(home.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Logs go to a file; the terminal belongs to the TUI
    adx_core::logging::init(args.log_level.as_deref())?;
    info!("adx {} starting", env!("CARGO_PKG_VERSION"));

    let mut settings = config::load_settings();
    args.apply_overrides(&mut settings);

    let result = match args.command {
        Some(Command::Devices) => print_devices(&settings),
        None => adx_tui::run(settings).await,
    };

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
        eprintln!("Details in {}", adx_core::logging::log_file().display());
    }
    result
}

/// `adx devices`
fn print_devices(settings: &Settings) -> Result<()> {
    let ctx = ActionContext::from_settings(settings);
    let devices = list_devices(&ctx.ops.adb)?;

    if devices.is_empty() {
        println!("No devices connected");
        return Ok(());
    }

    for device in &devices {
        println!("{} {}", device.status_indicator(), device.display_name());
    }

    let summary: Vec<String> = count_by_type(&devices)
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(kind, n)| format!("{} {}", kind.indicator(), n))
        .collect();
    println!("Devices: {}", summary.join(" "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_launches_tui() {
        let args = Args::try_parse_from(["adx"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_devices_subcommand() {
        let args = Args::try_parse_from(["adx", "--log-level", "debug", "devices"]).unwrap();
        assert_eq!(args.command, Some(Command::Devices));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_path_overrides_replace_config() {
        let args = Args::try_parse_from([
            "adx",
            "--media-dir",
            "/tmp/shots",
            "--android-home",
            "/opt/sdk",
        ])
        .unwrap();

        let mut settings = Settings::default();
        settings.paths.media_dir = Some(PathBuf::from("/home/me/Downloads"));
        args.apply_overrides(&mut settings);

        assert_eq!(settings.paths.media_dir, Some(PathBuf::from("/tmp/shots")));
        assert_eq!(settings.paths.android_home, Some(PathBuf::from("/opt/sdk")));
    }

    #[test]
    fn test_missing_override_keeps_config() {
        let args = Args::try_parse_from(["adx"]).unwrap();
        let mut settings = Settings::default();
        settings.paths.android_home = Some(PathBuf::from("/opt/sdk"));
        args.apply_overrides(&mut settings);

        assert_eq!(settings.paths.android_home, Some(PathBuf::from("/opt/sdk")));
    }
}
