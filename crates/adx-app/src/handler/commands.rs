//! Menu command execution and text input submission

use adx_core::CommandId;
use adx_daemon::{parse_ip_and_port, Avd, SettingKind};

use crate::editor::EditorRequest;
use crate::message::{Message, RefreshReason};
use crate::state::{Activity, AppState, Mode, PendingText, TextAction};

use super::{UpdateAction, UpdateResult};

pub(crate) const WIFI_CONNECT_PROMPT: &str = "Enter IP address or IP:port (e.g., 192.168.1.100 or 192.168.1.100:5555)\nDefaults to port 4444 if not specified";

pub(crate) const WIFI_DISCONNECT_PROMPT: &str = "Enter IP address or IP:port to disconnect (e.g., 192.168.1.100 or 192.168.1.100:5555)\nDefaults to port 4444 if not specified";

pub(crate) const WIFI_PAIR_ADDRESS_PROMPT: &str =
    "Enter pairing address from phone (e.g., 192.168.3.30:43719)";

pub(crate) fn pair_code_prompt(address: &str) -> String {
    format!("Enter 6-digit pairing code from phone for {address}")
}

/// The display setting a command edits
pub(crate) fn setting_kind(id: CommandId) -> Option<SettingKind> {
    match id {
        CommandId::Dpi => Some(SettingKind::Dpi),
        CommandId::FontSize => Some(SettingKind::FontSize),
        CommandId::ScreenSize => Some(SettingKind::ScreenSize),
        _ => None,
    }
}

/// Enter in any mode
pub(crate) fn activate(state: &mut AppState) -> UpdateResult {
    match state.mode {
        Mode::Menu => execute_selected_command(state),
        Mode::DeviceSelect => select_device(state),
        Mode::EmulatorSelect => select_emulator(state),
        Mode::TextInput => submit_text(state),
    }
}

fn execute_selected_command(state: &mut AppState) -> UpdateResult {
    let Some(entry) = state.selected_entry().copied() else {
        return UpdateResult::none();
    };

    match entry.id {
        CommandId::LaunchEmulator | CommandId::ConfigureEmulator => {
            state.pending_command = Some(entry.id);
            state.mode = Mode::EmulatorSelect;
            // A load still in flight fills the picker when it lands
            if state.is_active(Activity::LoadingAvds) {
                return UpdateResult::none();
            }
            state.begin(Activity::LoadingAvds);
            UpdateResult::action(UpdateAction::LoadAvds)
        }
        CommandId::ConnectWifi => {
            state.enter_text_input(PendingText::new(
                TextAction::WifiConnect,
                WIFI_CONNECT_PROMPT,
            ));
            UpdateResult::none()
        }
        CommandId::DisconnectWifi => {
            state.enter_text_input(PendingText::new(
                TextAction::WifiDisconnect,
                WIFI_DISCONNECT_PROMPT,
            ));
            UpdateResult::none()
        }
        CommandId::PairWifi => {
            state.enter_text_input(PendingText::new(
                TextAction::WifiPairAddress,
                WIFI_PAIR_ADDRESS_PROMPT,
            ));
            UpdateResult::none()
        }
        CommandId::RefreshDevices => UpdateResult::message(Message::RefreshDevices {
            reason: RefreshReason::Manual,
        }),
        CommandId::Screenshot
        | CommandId::ScreenshotDayNight
        | CommandId::ScreenRecord
        | CommandId::Dpi
        | CommandId::FontSize
        | CommandId::ScreenSize => {
            // A single device needs no picker
            if let [device] = state.devices.as_slice() {
                let serial = device.serial.clone();
                return execute_for_device(state, entry.id, serial);
            }
            state.pending_command = Some(entry.id);
            state.mode = Mode::DeviceSelect;
            UpdateResult::none()
        }
    }
}

fn select_device(state: &mut AppState) -> UpdateResult {
    let Some(serial) = state.selected_device().map(|d| d.serial.clone()) else {
        return UpdateResult::none();
    };
    let command = state.pending_command;
    state.return_to_menu();

    match command {
        Some(id) => execute_for_device(state, id, serial),
        None => UpdateResult::none(),
    }
}

fn select_emulator(state: &mut AppState) -> UpdateResult {
    let Some(avd) = state.selected_avd().cloned() else {
        return UpdateResult::none();
    };
    let command = state.pending_command;
    state.return_to_menu();

    match command {
        Some(CommandId::LaunchEmulator) => launch_emulator(state, avd),
        Some(CommandId::ConfigureEmulator) => {
            state.editor_request = Some(EditorRequest {
                config_path: avd.config_path(),
                avd_name: avd.name,
            });
            UpdateResult::none()
        }
        _ => UpdateResult::none(),
    }
}

/// Start a device command against `serial`
pub(crate) fn execute_for_device(
    state: &mut AppState,
    id: CommandId,
    serial: String,
) -> UpdateResult {
    state.mode = Mode::Menu;

    if let Some(kind) = setting_kind(id) {
        if already_running(state, Activity::LoadingSetting) {
            return UpdateResult::none();
        }
        state.begin(Activity::LoadingSetting);
        return UpdateResult::action(UpdateAction::LoadSetting {
            kind,
            serial,
            reload: false,
        });
    }

    match id {
        CommandId::Screenshot => {
            if already_running(state, Activity::Screenshot) {
                return UpdateResult::none();
            }
            state.log.clear();
            state.begin(Activity::Screenshot);
            UpdateResult::action(UpdateAction::TakeScreenshot { serial })
        }
        CommandId::ScreenshotDayNight => {
            if already_running(state, Activity::DayNight) {
                return UpdateResult::none();
            }
            state.log.clear();
            state.begin(Activity::DayNight);
            UpdateResult::action(UpdateAction::TakeDayNightScreenshots { serial })
        }
        CommandId::ScreenRecord => {
            if state.is_recording()
                || state.is_active(Activity::Recording)
                || state.is_active(Activity::SavingRecording)
            {
                state.log.error("A screen recording is already in progress");
                return UpdateResult::none();
            }
            state.log.clear();
            state.begin(Activity::Recording);
            UpdateResult::action(UpdateAction::StartRecording { serial })
        }
        _ => UpdateResult::none(),
    }
}

fn launch_emulator(state: &mut AppState, avd: Avd) -> UpdateResult {
    if already_running(state, Activity::LaunchingEmulator) {
        return UpdateResult::none();
    }
    state.log.clear();
    state.begin(Activity::LaunchingEmulator);
    UpdateResult::action(UpdateAction::LaunchEmulator { avd })
}

/// Refuse a second operation of a kind that is still in flight
///
/// Each activity flag belongs to one running operation; its outcome
/// clears the flag.
fn already_running(state: &mut AppState, activity: Activity) -> bool {
    if !state.is_active(activity) {
        return false;
    }
    state
        .log
        .info(format!("{} is already in progress", activity.progress_text()));
    true
}

/// Check an `IP` / `IP:PORT` entry before anything is dispatched
pub(crate) fn validate_address(input: &str) -> Result<(), String> {
    if input.is_empty() {
        return Err("IP address is required".to_string());
    }
    let (ip, _) = parse_ip_and_port(input).map_err(|e| e.to_string())?;
    if ip.is_empty() {
        return Err(format!("invalid IP address format: {input}"));
    }
    Ok(())
}

fn submit_text(state: &mut AppState) -> UpdateResult {
    let Some(pending) = state.pending_text.as_ref() else {
        state.return_to_menu();
        return UpdateResult::none();
    };
    let action = pending.action.clone();
    let input = pending.input.trim().to_string();

    match action {
        TextAction::WifiConnect | TextAction::WifiDisconnect => {
            if let Err(e) = validate_address(&input) {
                state.log.error(e);
                return UpdateResult::none();
            }
            let activity = if action == TextAction::WifiConnect {
                Activity::WifiConnect
            } else {
                Activity::WifiDisconnect
            };
            if already_running(state, activity) {
                return UpdateResult::none();
            }
            state.return_to_menu();
            state.log.clear();
            state.begin(activity);
            if activity == Activity::WifiConnect {
                UpdateResult::action(UpdateAction::ConnectWifi { address: input })
            } else {
                UpdateResult::action(UpdateAction::DisconnectWifi { address: input })
            }
        }

        TextAction::WifiPairAddress => {
            if let Err(e) = validate_address(&input) {
                state.log.error(e);
                return UpdateResult::none();
            }
            // Second step re-enters text input with a new prompt
            let prompt = pair_code_prompt(&input);
            state.enter_text_input(PendingText::new(
                TextAction::WifiPairCode { address: input },
                prompt,
            ));
            UpdateResult::none()
        }

        TextAction::WifiPairCode { address } => {
            if input.is_empty() {
                state.log.error("Pairing code is required");
                return UpdateResult::none();
            }
            if already_running(state, Activity::WifiPair) {
                return UpdateResult::none();
            }
            state.return_to_menu();
            state.log.clear();
            state.begin(Activity::WifiPair);
            UpdateResult::action(UpdateAction::PairWifi {
                address,
                code: input,
            })
        }

        TextAction::ChangeSetting { kind, serial } => {
            if let Err(e) = kind.validate(&input) {
                state.log.error(e.to_string());
                return UpdateResult::none();
            }
            if already_running(state, Activity::ChangingSetting) {
                return UpdateResult::none();
            }
            // Stay on the prompt so the refreshed value shows up
            if let Some(pending) = state.pending_text.as_mut() {
                pending.input.clear();
            }
            state.begin(Activity::ChangingSetting);
            UpdateResult::action(UpdateAction::ChangeSetting {
                kind,
                serial,
                value: input,
            })
        }
    }
}
