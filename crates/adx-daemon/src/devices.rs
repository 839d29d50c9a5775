//! Device enumeration via `adb devices -l`

use std::fmt;

use adx_core::prelude::*;

use crate::runner::Adb;

/// How a device is attached to the host, derived from its serial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionType {
    Physical,
    Emulator,
    WiFi,
}

impl ConnectionType {
    pub fn from_serial(serial: &str) -> Self {
        if serial.starts_with("emulator-") {
            ConnectionType::Emulator
        } else if serial.contains(':') {
            ConnectionType::WiFi
        } else {
            ConnectionType::Physical
        }
    }

    /// Status dot shown next to the device
    pub fn indicator(&self) -> &'static str {
        match self {
            ConnectionType::Emulator => "🟡",
            ConnectionType::WiFi => "🟢",
            ConnectionType::Physical => "🔵",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionType::Physical => "USB",
            ConnectionType::Emulator => "Emulator",
            ConnectionType::WiFi => "WiFi",
        }
    }
}

/// One row of `adb devices -l`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    pub serial: String,
    /// Bridge state: `device`, `offline`, `unauthorized`, ...
    pub status: String,
    pub model: String,
    pub product: String,
    pub device: String,
    pub transport_id: String,
}

impl Device {
    pub fn new(serial: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn connection_type(&self) -> ConnectionType {
        ConnectionType::from_serial(&self.serial)
    }

    pub fn status_indicator(&self) -> &'static str {
        self.connection_type().indicator()
    }

    /// Device is online and accepts commands
    pub fn is_ready(&self) -> bool {
        self.status == "device"
    }

    /// Human readable `serial (details)` string
    pub fn display_name(&self) -> String {
        if self.connection_type() == ConnectionType::Emulator {
            let mut details = Vec::new();
            if !self.model.is_empty() && !self.model.contains("sdk_gphone") {
                details.push(self.model.clone());
            } else if !self.product.is_empty() {
                details.push(clean_emulator_product(&self.product));
            }
            details.push("Emulator".to_string());
            return format!("{} ({})", self.serial, details.join(" • "));
        }

        if !self.model.is_empty() && !self.product.is_empty() {
            format!("{} ({} - {})", self.serial, self.model, self.product)
        } else if !self.model.is_empty() {
            format!("{} ({})", self.serial, self.model)
        } else {
            format!("{} ({})", self.serial, self.status)
        }
    }

    /// Secondary line with the remaining `key:value` fields, empty when none
    pub fn extended_info(&self) -> String {
        let mut parts = Vec::new();
        if self.connection_type() != ConnectionType::Emulator && !self.device.is_empty() {
            parts.push(format!("device: {}", self.device));
        }
        if !self.transport_id.is_empty() {
            parts.push(format!("transport {}", self.transport_id));
        }
        if !self.is_ready() {
            parts.push(self.status.clone());
        }
        parts.join(" • ")
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// `sdk_gphone64_arm64` -> `gphone64 arm64`
fn clean_emulator_product(product: &str) -> String {
    match product.strip_prefix("sdk_") {
        Some(rest) => rest.replace('_', " "),
        None => product.to_string(),
    }
}

/// Parse one device line, `None` for anything without serial and status
pub fn parse_device_line(line: &str) -> Option<Device> {
    let mut fields = line.split_whitespace();
    let serial = fields.next()?;
    let status = fields.next()?;

    let mut device = Device::new(serial, status);
    for field in fields {
        if let Some(v) = field.strip_prefix("model:") {
            device.model = v.to_string();
        } else if let Some(v) = field.strip_prefix("product:") {
            device.product = v.to_string();
        } else if let Some(v) = field.strip_prefix("device:") {
            device.device = v.to_string();
        } else if let Some(v) = field.strip_prefix("transport_id:") {
            device.transport_id = v.to_string();
        }
    }
    Some(device)
}

/// Parse the full `adb devices -l` output, skipping the header
pub fn parse_devices_output(output: &str) -> Vec<Device> {
    output
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('*'))
        .filter_map(parse_device_line)
        .collect()
}

/// List attached devices
pub fn list_devices(adb: &Adb) -> Result<Vec<Device>> {
    let output = adb
        .run(None, &["devices", "-l"])
        .context("failed to get devices")?;
    let devices = parse_devices_output(&output);
    debug!("found {} device(s)", devices.len());
    Ok(devices)
}

/// Count devices per connection type, in `Physical, Emulator, WiFi` order
pub fn count_by_type(devices: &[Device]) -> [(ConnectionType, usize); 3] {
    let count = |kind| {
        devices
            .iter()
            .filter(|d| d.connection_type() == kind)
            .count()
    };
    [
        (ConnectionType::Physical, count(ConnectionType::Physical)),
        (ConnectionType::Emulator, count(ConnectionType::Emulator)),
        (ConnectionType::WiFi, count(ConnectionType::WiFi)),
    ]
}
