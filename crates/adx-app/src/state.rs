//! Application state (Model in TEA pattern)

use std::collections::BTreeMap;
use std::time::Instant;

use adx_core::{catalog, filter_commands, CatalogEntry, CommandId, LogHistory};
use adx_daemon::{Avd, Device, RecordingHandle, SettingKind};

use crate::editor::EditorRequest;

/// Which input rules and body view apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Command menu with type-to-filter search
    #[default]
    Menu,
    DeviceSelect,
    EmulatorSelect,
    TextInput,
}

/// One kind of in-flight background work
///
/// Each flag is set when its operation is dispatched and cleared only by
/// that operation's outcome message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Activity {
    LoadingDevices,
    LoadingAvds,
    LoadingSetting,
    Screenshot,
    DayNight,
    Recording,
    SavingRecording,
    ChangingSetting,
    WifiConnect,
    WifiDisconnect,
    WifiPair,
    LaunchingEmulator,
}

impl Activity {
    /// Progress line text, shown next to the spinner
    pub fn progress_text(&self) -> &'static str {
        match self {
            Activity::LoadingDevices => "Loading devices",
            Activity::LoadingAvds => "Loading emulators",
            Activity::LoadingSetting => "Reading current setting",
            Activity::Screenshot => "Taking screenshot",
            Activity::DayNight => "Taking day-night screenshots",
            Activity::Recording => "Recording screen • Press Esc to stop",
            Activity::SavingRecording => "Saving screen recording",
            Activity::ChangingSetting => "Applying setting",
            Activity::WifiConnect => "Connecting to WiFi device",
            Activity::WifiDisconnect => "Disconnecting from WiFi device",
            Activity::WifiPair => "Pairing with WiFi device",
            Activity::LaunchingEmulator => "Launching emulator",
        }
    }

    /// Short tag for the status bar, for operations worth listing there
    pub fn status_label(&self) -> Option<&'static str> {
        match self {
            Activity::Screenshot => Some("📸 Screenshot"),
            Activity::DayNight => Some("📸 Day-Night"),
            Activity::Recording | Activity::SavingRecording => Some("🎥 Recording"),
            Activity::WifiConnect => Some("📶 Connecting"),
            Activity::WifiDisconnect => Some("📶 Disconnecting"),
            Activity::WifiPair => Some("📶 Pairing"),
            _ => None,
        }
    }
}

/// What submitting the text field does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextAction {
    WifiConnect,
    WifiDisconnect,
    /// First pairing step; the address is kept for the code prompt
    WifiPairAddress,
    WifiPairCode { address: String },
    ChangeSetting { kind: SettingKind, serial: String },
}

/// Prompt and buffer of the text input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingText {
    pub action: TextAction,
    pub prompt: String,
    pub input: String,
}

impl PendingText {
    pub fn new(action: TextAction, prompt: impl Into<String>) -> Self {
        Self {
            action,
            prompt: prompt.into(),
            input: String::new(),
        }
    }
}

/// Complete session state
#[derive(Debug)]
pub struct AppState {
    pub mode: Mode,

    /// Index into `filtered_commands`
    pub selected_command: usize,
    pub selected_device: usize,
    pub selected_emulator: usize,

    /// Empty means the categorized, unfiltered menu
    pub search_query: String,
    /// Always derived from `search_query`
    pub filtered_commands: Vec<CatalogEntry>,

    /// Command waiting for a device or emulator pick
    pub pending_command: Option<CommandId>,
    /// Present only while `mode == TextInput`
    pub pending_text: Option<PendingText>,

    pub log: LogHistory,
    pub devices: Vec<Device>,
    pub avds: Vec<Avd>,
    /// Device enumeration problem, shown above the body
    pub error_banner: Option<String>,

    /// In-flight operations with their start time
    pub activities: BTreeMap<Activity, Instant>,
    pub recording: Option<RecordingHandle>,

    /// Advanced on every tick
    pub spinner: usize,

    /// Set when the runner should suspend the terminal and open an editor
    pub editor_request: Option<EditorRequest>,

    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_log_capacity(adx_core::DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            mode: Mode::Menu,
            selected_command: 0,
            selected_device: 0,
            selected_emulator: 0,
            search_query: String::new(),
            filtered_commands: catalog().to_vec(),
            pending_command: None,
            pending_text: None,
            log: LogHistory::new(capacity),
            devices: Vec::new(),
            avds: Vec::new(),
            error_banner: None,
            activities: BTreeMap::new(),
            recording: None,
            spinner: 0,
            editor_request: None,
            should_quit: false,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────

    pub fn is_filtering(&self) -> bool {
        !self.search_query.is_empty()
    }

    pub fn push_query_char(&mut self, c: char) {
        self.search_query.push(c);
        self.refilter();
        self.selected_command = 0;
    }

    pub fn pop_query_char(&mut self) {
        if self.search_query.pop().is_some() {
            self.refilter();
            self.clamp_selections();
        }
    }

    pub fn clear_query(&mut self) {
        if self.is_filtering() {
            self.search_query.clear();
            self.refilter();
            self.selected_command = 0;
        }
    }

    fn refilter(&mut self) {
        self.filtered_commands = filter_commands(&self.search_query, catalog());
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.filtered_commands.get(self.selected_command)
    }

    // ─────────────────────────────────────────────────────────
    // Lists
    // ─────────────────────────────────────────────────────────

    pub fn selected_device(&self) -> Option<&Device> {
        self.devices.get(self.selected_device)
    }

    pub fn selected_avd(&self) -> Option<&Avd> {
        self.avds.get(self.selected_emulator)
    }

    pub fn set_devices(&mut self, devices: Vec<Device>) {
        self.devices = devices;
        self.clamp_selections();
    }

    pub fn set_avds(&mut self, avds: Vec<Avd>) {
        self.avds = avds;
        self.clamp_selections();
    }

    /// Reset any index that fell off the end of its list
    pub fn clamp_selections(&mut self) {
        self.selected_command = clamp_index(self.selected_command, self.filtered_commands.len());
        self.selected_device = clamp_index(self.selected_device, self.devices.len());
        self.selected_emulator = clamp_index(self.selected_emulator, self.avds.len());
    }

    /// Length of the list the current mode navigates
    pub fn current_list_len(&self) -> usize {
        match self.mode {
            Mode::Menu => self.filtered_commands.len(),
            Mode::DeviceSelect => self.devices.len(),
            Mode::EmulatorSelect => self.avds.len(),
            Mode::TextInput => 0,
        }
    }

    fn current_index_mut(&mut self) -> Option<&mut usize> {
        match self.mode {
            Mode::Menu => Some(&mut self.selected_command),
            Mode::DeviceSelect => Some(&mut self.selected_device),
            Mode::EmulatorSelect => Some(&mut self.selected_emulator),
            Mode::TextInput => None,
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(index) = self.current_index_mut() {
            *index = index.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self) {
        let len = self.current_list_len();
        if let Some(index) = self.current_index_mut() {
            if *index + 1 < len {
                *index += 1;
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // Modes
    // ─────────────────────────────────────────────────────────

    /// Back to the menu, dropping whatever the other modes held
    pub fn return_to_menu(&mut self) {
        self.mode = Mode::Menu;
        self.pending_command = None;
        self.pending_text = None;
    }

    pub fn enter_text_input(&mut self, pending: PendingText) {
        self.mode = Mode::TextInput;
        self.pending_text = Some(pending);
    }

    // ─────────────────────────────────────────────────────────
    // Activities
    // ─────────────────────────────────────────────────────────

    pub fn begin(&mut self, activity: Activity) {
        self.activities.insert(activity, Instant::now());
    }

    pub fn finish(&mut self, activity: Activity) {
        self.activities.remove(&activity);
    }

    pub fn is_active(&self, activity: Activity) -> bool {
        self.activities.contains_key(&activity)
    }

    pub fn is_busy(&self) -> bool {
        !self.activities.is_empty()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// `index` if it is inside a list of `len` items, otherwise 0
pub fn clamp_index(index: usize, len: usize) -> usize {
    if index < len {
        index
    } else {
        0
    }
}
