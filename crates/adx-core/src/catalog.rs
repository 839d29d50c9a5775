//! Static command catalog
//!
//! The catalog is built once and never mutated. Menu order is the
//! declaration order below; the categorized view groups by [`Category`]
//! in [`Category::ALL`] order.

use std::fmt;

/// Stable identifier of a menu command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Screenshot,
    ScreenshotDayNight,
    ScreenRecord,
    Dpi,
    FontSize,
    ScreenSize,
    PairWifi,
    ConnectWifi,
    DisconnectWifi,
    LaunchEmulator,
    ConfigureEmulator,
    RefreshDevices,
}

impl CommandId {
    /// Kebab-case identifier, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandId::Screenshot => "screenshot",
            CommandId::ScreenshotDayNight => "screenshot-day-night",
            CommandId::ScreenRecord => "screen-record",
            CommandId::Dpi => "dpi",
            CommandId::FontSize => "font-size",
            CommandId::ScreenSize => "screen-size",
            CommandId::PairWifi => "pair-wifi",
            CommandId::ConnectWifi => "connect-wifi",
            CommandId::DisconnectWifi => "disconnect-wifi",
            CommandId::LaunchEmulator => "launch-emulator",
            CommandId::ConfigureEmulator => "configure-emulator",
            CommandId::RefreshDevices => "refresh-devices",
        }
    }

    /// Whether the command runs against a single connected device
    pub fn needs_device(&self) -> bool {
        matches!(
            self,
            CommandId::Screenshot
                | CommandId::ScreenshotDayNight
                | CommandId::ScreenRecord
                | CommandId::Dpi
                | CommandId::FontSize
                | CommandId::ScreenSize
        )
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Menu section a command is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Media,
    DeviceSettings,
    Wifi,
    DevicesEmulators,
}

impl Category {
    /// Display order of the categorized menu
    pub const ALL: [Category; 4] = [
        Category::Media,
        Category::DeviceSettings,
        Category::Wifi,
        Category::DevicesEmulators,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Media => "Media",
            Category::DeviceSettings => "Device settings",
            Category::Wifi => "WiFi",
            Category::DevicesEmulators => "Devices/emulators",
        }
    }
}

/// One immutable catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: CommandId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
}

const fn entry(
    id: CommandId,
    name: &'static str,
    description: &'static str,
    category: Category,
) -> CatalogEntry {
    CatalogEntry {
        id,
        name,
        description,
        category,
    }
}

static CATALOG: [CatalogEntry; 12] = [
    entry(
        CommandId::Screenshot,
        "Screenshot",
        "Take a screenshot",
        Category::Media,
    ),
    entry(
        CommandId::ScreenshotDayNight,
        "Screenshot day-night",
        "Take screenshots in day and night mode",
        Category::Media,
    ),
    entry(
        CommandId::ScreenRecord,
        "Screen record",
        "Record the screen",
        Category::Media,
    ),
    entry(
        CommandId::Dpi,
        "DPI",
        "View or change device DPI",
        Category::DeviceSettings,
    ),
    entry(
        CommandId::FontSize,
        "Font size",
        "View or change device font size",
        Category::DeviceSettings,
    ),
    entry(
        CommandId::ScreenSize,
        "Screen size",
        "View or change device screen size",
        Category::DeviceSettings,
    ),
    entry(
        CommandId::PairWifi,
        "Pair WiFi device",
        "Pair with a new WiFi device",
        Category::Wifi,
    ),
    entry(
        CommandId::ConnectWifi,
        "Connect WiFi device",
        "Connect to a WiFi device",
        Category::Wifi,
    ),
    entry(
        CommandId::DisconnectWifi,
        "Disconnect WiFi device",
        "Disconnect from a WiFi device",
        Category::Wifi,
    ),
    entry(
        CommandId::LaunchEmulator,
        "Launch emulator",
        "Start an Android emulator",
        Category::DevicesEmulators,
    ),
    entry(
        CommandId::ConfigureEmulator,
        "Configure emulator",
        "Edit emulator configuration",
        Category::DevicesEmulators,
    ),
    entry(
        CommandId::RefreshDevices,
        "Refresh devices",
        "Refresh the device list",
        Category::DevicesEmulators,
    ),
];

/// The full catalog in menu order
pub fn catalog() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Catalog grouped by category, categories in display order
///
/// Flattening the groups yields the same sequence as [`catalog()`], so a
/// single running index addresses both views.
pub fn categories() -> Vec<(Category, Vec<&'static CatalogEntry>)> {
    Category::ALL
        .iter()
        .map(|category| {
            let entries = CATALOG
                .iter()
                .filter(|e| e.category == *category)
                .collect::<Vec<_>>();
            (*category, entries)
        })
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_every_command_once() {
        let ids: Vec<_> = catalog().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 12);
        let mut unique = ids.clone();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_categories_flatten_to_catalog_order() {
        let flattened: Vec<CommandId> = categories()
            .into_iter()
            .flat_map(|(_, entries)| entries.into_iter().map(|e| e.id))
            .collect();
        let direct: Vec<CommandId> = catalog().iter().map(|e| e.id).collect();
        assert_eq!(flattened, direct);
    }

    #[test]
    fn test_category_order() {
        let labels: Vec<_> = categories().iter().map(|(c, _)| c.label()).collect();
        assert_eq!(
            labels,
            vec!["Media", "Device settings", "WiFi", "Devices/emulators"]
        );
    }

    #[test]
    fn test_needs_device() {
        assert!(CommandId::Screenshot.needs_device());
        assert!(CommandId::ScreenSize.needs_device());
        assert!(!CommandId::ConnectWifi.needs_device());
        assert!(!CommandId::LaunchEmulator.needs_device());
        assert!(!CommandId::RefreshDevices.needs_device());
    }

    #[test]
    fn test_command_id_display() {
        assert_eq!(CommandId::ScreenshotDayNight.to_string(), "screenshot-day-night");
        assert_eq!(CommandId::FontSize.as_str(), "font-size");
    }
}
