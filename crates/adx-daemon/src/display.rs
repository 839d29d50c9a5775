//! Display settings: density, font scale and resolution
//!
//! Each [`SettingKind`] knows how to read its current value, validate user
//! input and apply a new value through `adb shell`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use adx_core::prelude::*;

use crate::capture;
use crate::runner::Adb;

static DENSITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(Physical|Override) density:\s*(\d+)")
        .expect("Invalid density pattern regex")
});

static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(Physical|Override) size:\s*(\S+)").expect("Invalid size pattern regex")
});

/// Which display setting is being changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKind {
    Dpi,
    FontSize,
    ScreenSize,
}

impl SettingKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SettingKind::Dpi => "DPI",
            SettingKind::FontSize => "Font Size",
            SettingKind::ScreenSize => "Screen Size",
        }
    }

    pub fn input_prompt(&self) -> &'static str {
        match self {
            SettingKind::Dpi => "Enter new DPI:",
            SettingKind::FontSize => "Enter new font size (e.g., 1.2):",
            SettingKind::ScreenSize => "Enter new screen size (e.g., 1080x1920):",
        }
    }

    /// Read the current and factory values from the device
    pub fn info(&self, adb: &Adb, serial: &str) -> Result<SettingInfo> {
        let (current, default) = match self {
            SettingKind::Dpi => {
                let out = adb
                    .shell(serial, &["wm", "density"])
                    .map_err(|e| Error::operation(format!("failed to get current DPI: {e}")))?;
                let (physical, current) = parse_density(&out)?;
                (current.to_string(), physical.to_string())
            }
            SettingKind::FontSize => {
                let out = adb
                    .shell(serial, &["settings", "get", "system", "font_scale"])
                    .map_err(|e| {
                        Error::operation(format!("failed to get current font size: {e}"))
                    })?;
                (format!("{:.1}", parse_font_scale(&out)?), "1.0".to_string())
            }
            SettingKind::ScreenSize => {
                let out = adb.shell(serial, &["wm", "size"]).map_err(|e| {
                    Error::operation(format!("failed to get current screen size: {e}"))
                })?;
                let (physical, current) = parse_size(&out)?;
                (current, physical)
            }
        };

        Ok(SettingInfo {
            kind: *self,
            serial: serial.to_string(),
            current,
            default,
        })
    }

    /// Check user input without touching the device
    pub fn validate(&self, value: &str) -> Result<()> {
        match self {
            SettingKind::Dpi => value
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| Error::validation(format!("invalid DPI value: {value}"))),
            SettingKind::FontSize => value
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| Error::validation(format!("invalid font size value: {value}"))),
            SettingKind::ScreenSize => {
                let parts: Vec<&str> = value.split('x').collect();
                if parts.len() != 2 {
                    return Err(Error::validation(format!(
                        "invalid screen size format: {value} (expected format: 1080x1920)"
                    )));
                }
                if parts.iter().any(|p| p.parse::<i64>().is_err()) {
                    return Err(Error::validation(format!(
                        "invalid screen size format: {value} (both width and height must be numbers)"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Validate and write `value`, returning the value as applied
    pub fn apply(&self, adb: &Adb, serial: &str, value: &str) -> Result<String> {
        self.validate(value)?;

        let applied = match self {
            SettingKind::Dpi => {
                adb.shell(serial, &["wm", "density", value]).map_err(|e| {
                    Error::operation(format!("failed to set DPI to {value}: {e}"))
                })?;
                capture::out(format!("DPI changed to {value} on device {serial}"));
                value.to_string()
            }
            SettingKind::FontSize => {
                let scale = value
                    .parse::<f64>()
                    .map_err(|_| Error::validation(format!("invalid font size value: {value}")))?;
                let scale = format!("{scale:.1}");
                adb.shell(serial, &["settings", "put", "system", "font_scale", &scale])
                    .map_err(|e| {
                        Error::operation(format!("failed to set font size to {scale}: {e}"))
                    })?;
                capture::out(format!("Font size changed to {scale} on device {serial}"));
                scale
            }
            SettingKind::ScreenSize => {
                adb.shell(serial, &["wm", "size", value]).map_err(|e| {
                    Error::operation(format!("failed to set screen size to {value}: {e}"))
                })?;
                capture::out(format!("Screen size changed to {value} on device {serial}"));
                value.to_string()
            }
        };

        Ok(applied)
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Current value of a setting on one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingInfo {
    pub kind: SettingKind,
    pub serial: String,
    pub current: String,
    /// Physical/factory value
    pub default: String,
}

impl SettingInfo {
    /// Text shown above the input field
    pub fn prompt(&self) -> String {
        let name = self.kind.display_name();
        format!(
            "Device: {}\nPhysical {name}: {}\nCurrent {name}: {}\n\n{}",
            self.serial,
            self.default,
            self.current,
            self.kind.input_prompt()
        )
    }
}

/// `(physical, effective)` from `wm density` output
pub fn parse_density(output: &str) -> Result<(u32, u32)> {
    let mut physical = None;
    let mut overridden = None;

    for caps in DENSITY_PATTERN.captures_iter(output) {
        let Ok(value) = caps[2].parse::<u32>() else {
            continue;
        };
        match &caps[1] {
            "Physical" => physical = Some(value),
            _ => overridden = Some(value),
        }
    }

    let physical = physical.ok_or_else(|| {
        Error::parse("DPI", format!("no physical density in {:?}", output.trim()))
    })?;
    Ok((physical, overridden.unwrap_or(physical)))
}

/// `(physical, effective)` from `wm size` output
pub fn parse_size(output: &str) -> Result<(String, String)> {
    let mut physical = None;
    let mut overridden = None;

    for caps in SIZE_PATTERN.captures_iter(output) {
        let value = caps[2].to_string();
        match &caps[1] {
            "Physical" => physical = Some(value),
            _ => overridden = Some(value),
        }
    }

    let physical = physical.ok_or_else(|| {
        Error::parse("screen size", format!("no physical size in {:?}", output.trim()))
    })?;
    let current = overridden.unwrap_or_else(|| physical.clone());
    Ok((physical, current))
}

/// Font scale from `settings get system font_scale`; unset means 1.0
pub fn parse_font_scale(output: &str) -> Result<f64> {
    let value = output.trim();
    if value.is_empty() || value == "null" {
        return Ok(1.0);
    }
    value
        .parse::<f64>()
        .map_err(|_| Error::parse("font size", format!("unexpected output {value:?}")))
}
