//! Android Virtual Device discovery and launching
//!
//! AVDs are read straight from the descriptor directory: every `NAME.ini`
//! points at a `NAME.avd/` directory whose `config.ini` carries the
//! display metadata.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use adx_core::prelude::*;

/// One virtual device descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Avd {
    /// Name passed to `emulator -avd`
    pub name: String,
    pub target: String,
    /// The `NAME.avd` directory
    pub path: PathBuf,
    pub display_name: String,
    pub architecture: String,
    pub resolution: String,
    pub api_level: String,
}

impl Avd {
    /// `config.ini` inside the AVD directory
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config.ini")
    }

    /// `Display Name (API 34 • arm64-v8a • 1080x2400)`
    pub fn label(&self) -> String {
        let name = if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        };

        let mut details = Vec::new();
        if !self.api_level.is_empty() {
            details.push(format!("API {}", self.api_level));
        }
        if !self.architecture.is_empty() {
            details.push(self.architecture.clone());
        }
        if !self.resolution.is_empty() {
            details.push(self.resolution.clone());
        }

        if details.is_empty() {
            name.clone()
        } else {
            format!("{} ({})", name, details.join(" • "))
        }
    }
}

impl fmt::Display for Avd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// List AVDs under `avd_home`, sorted by name
///
/// A missing directory is not an error: it just means nothing was created yet.
pub fn list_avds(avd_home: &Path) -> Result<Vec<Avd>> {
    let entries = match fs::read_dir(avd_home) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("AVD directory {} does not exist", avd_home.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(Error::config(format!(
                "failed to read AVD directory {}: {e}",
                avd_home.display()
            )))
        }
    };

    let mut avds = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let Some(name) = file_name.strip_suffix(".ini") else {
            continue;
        };
        avds.push(read_avd(avd_home, name, &entry.path()));
    }

    avds.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(avds)
}

fn read_avd(avd_home: &Path, name: &str, ini_path: &Path) -> Avd {
    let ini = fs::read_to_string(ini_path).unwrap_or_default();

    let mut target = String::new();
    let mut path = String::new();
    for line in ini.lines() {
        if let Some(v) = line.strip_prefix("target=") {
            target = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("path=") {
            path = v.trim().to_string();
        }
    }

    let path = if path.is_empty() {
        avd_home.join(format!("{name}.avd"))
    } else {
        PathBuf::from(path)
    };

    let mut avd = Avd {
        name: name.to_string(),
        target,
        path,
        ..Default::default()
    };

    if let Ok(config) = fs::read_to_string(avd.config_path()) {
        apply_config(&mut avd, &config);
    }
    if avd.api_level.is_empty() {
        if let Some(level) = api_from_path(&avd.target) {
            avd.api_level = level;
        }
    }
    avd
}

/// Fill display fields from `config.ini` contents
fn apply_config(avd: &mut Avd, config: &str) {
    let mut width = "";
    let mut height = "";

    for line in config.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            "avd.ini.displayname" => avd.display_name = value.to_string(),
            "abi.type" | "hw.cpu.arch" if avd.architecture.is_empty() => {
                avd.architecture = value.to_string()
            }
            "hw.lcd.width" => width = value,
            "hw.lcd.height" => height = value,
            _ if key.starts_with("image.sysdir") => {
                if let Some(level) = api_from_path(value) {
                    avd.api_level = level;
                }
            }
            _ => {}
        }
    }

    if !width.is_empty() && !height.is_empty() {
        avd.resolution = format!("{width}x{height}");
    }
}

/// `system-images/android-34/google_apis/arm64-v8a/` -> `34`
fn api_from_path(value: &str) -> Option<String> {
    value
        .split('/')
        .find_map(|part| part.strip_prefix("android-"))
        .filter(|level| !level.is_empty())
        .map(str::to_string)
}

/// Start `emulator -avd NAME` in the background
///
/// The child is detached: its stdio is nulled and it outlives adx.
pub fn launch_avd(emulator: &Path, avd: &Avd) -> Result<u32> {
    let child = Command::new(emulator)
        .args(["-avd", &avd.name, "-dns-server", "8.8.8.8"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::process_spawn(format!("{}: {e}", emulator.display())))?;

    let pid = child.id();
    info!("launched emulator {} (pid {})", avd.name, pid);
    Ok(pid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_avd(home: &Path, name: &str, target: &str, config: &str) {
        let dir = home.join(format!("{name}.avd"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            home.join(format!("{name}.ini")),
            format!(
                "avd.ini.encoding=UTF-8\npath={}\ntarget={}\n",
                dir.display(),
                target
            ),
        )
        .unwrap();
        fs::write(dir.join("config.ini"), config).unwrap();
    }

    #[test]
    fn test_list_avds_reads_config() {
        let home = tempdir().unwrap();
        write_avd(
            home.path(),
            "Pixel_8_API_34",
            "android-34",
            "avd.ini.displayname = Pixel 8 API 34\n\
             abi.type = arm64-v8a\n\
             hw.cpu.arch = arm64\n\
             hw.lcd.width = 1080\n\
             hw.lcd.height = 2400\n\
             image.sysdir.1 = system-images/android-34/google_apis/arm64-v8a/\n",
        );

        let avds = list_avds(home.path()).unwrap();
        assert_eq!(avds.len(), 1);

        let avd = &avds[0];
        assert_eq!(avd.name, "Pixel_8_API_34");
        assert_eq!(avd.display_name, "Pixel 8 API 34");
        assert_eq!(avd.architecture, "arm64-v8a");
        assert_eq!(avd.resolution, "1080x2400");
        assert_eq!(avd.api_level, "34");
        assert_eq!(avd.label(), "Pixel 8 API 34 (API 34 • arm64-v8a • 1080x2400)");
        assert_eq!(avd.config_path(), home.path().join("Pixel_8_API_34.avd/config.ini"));
    }

    #[test]
    fn test_api_level_falls_back_to_target() {
        let home = tempdir().unwrap();
        write_avd(home.path(), "Small", "android-30", "hw.cpu.arch = x86_64\n");

        let avds = list_avds(home.path()).unwrap();
        assert_eq!(avds[0].api_level, "30");
        assert_eq!(avds[0].architecture, "x86_64");
        assert_eq!(avds[0].label(), "Small (API 30 • x86_64)");
    }

    #[test]
    fn test_missing_path_uses_conventional_directory() {
        let home = tempdir().unwrap();
        fs::write(home.path().join("Bare.ini"), "target=android-33\n").unwrap();

        let avds = list_avds(home.path()).unwrap();
        assert_eq!(avds[0].path, home.path().join("Bare.avd"));
        assert_eq!(avds[0].label(), "Bare (API 33)");
    }

    #[test]
    fn test_sorted_and_non_ini_ignored() {
        let home = tempdir().unwrap();
        write_avd(home.path(), "Zeta", "android-33", "");
        write_avd(home.path(), "Alpha", "android-33", "");
        fs::write(home.path().join("notes.txt"), "hello").unwrap();

        let names: Vec<_> = list_avds(home.path())
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let home = tempdir().unwrap();
        let avds = list_avds(&home.path().join("nope")).unwrap();
        assert!(avds.is_empty());
    }

    #[test]
    fn test_launch_missing_emulator_fails() {
        let avd = Avd {
            name: "Pixel".into(),
            ..Default::default()
        };
        let err = launch_avd(Path::new("/nonexistent/adx-test/emulator"), &avd).unwrap_err();
        assert!(matches!(err, Error::ProcessSpawn { .. }));
    }
}
