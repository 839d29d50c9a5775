//! Fixture builders for device and AVD values

use std::path::PathBuf;

use super::{Avd, Device};

/// Creates an online device from its serial.
///
/// The connection type follows from the serial (`emulator-5554`,
/// `10.0.0.2:4444`, anything else is USB).
pub fn test_device(serial: &str) -> Device {
    test_device_with_model(serial, "")
}

/// Creates an online device with a model name.
pub fn test_device_with_model(serial: &str, model: &str) -> Device {
    Device {
        serial: serial.to_string(),
        status: "device".to_string(),
        model: model.to_string(),
        ..Default::default()
    }
}

/// Creates an AVD rooted at `/tmp/avd/NAME.avd`.
pub fn test_avd(name: &str) -> Avd {
    Avd {
        name: name.to_string(),
        target: "android-34".to_string(),
        path: PathBuf::from("/tmp/avd").join(format!("{name}.avd")),
        api_level: "34".to_string(),
        ..Default::default()
    }
}
