//! Main update function - handles state transitions (TEA pattern)

use adx_core::prelude::*;

use crate::message::{Message, OperationOutcome, RefreshReason};
use crate::state::{Activity, AppState, Mode, PendingText, TextAction};

use super::{commands, keys::handle_key, UpdateAction, UpdateResult};

const NO_DEVICES: &str = "no devices connected";

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => {
            state.spinner = state.spinner.wrapping_add(1);
            UpdateResult::none()
        }

        Message::Quit => {
            state.should_quit = true;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::SelectPrevious => {
            state.select_previous();
            UpdateResult::none()
        }

        Message::SelectNext => {
            state.select_next();
            UpdateResult::none()
        }

        Message::Activate => commands::activate(state),

        Message::Cancel => {
            match state.mode {
                Mode::Menu => state.clear_query(),
                _ => state.return_to_menu(),
            }
            UpdateResult::none()
        }

        Message::TypeChar(c) => {
            match state.mode {
                Mode::Menu => state.push_query_char(c),
                Mode::TextInput => {
                    if let Some(pending) = state.pending_text.as_mut() {
                        pending.input.push(c);
                    }
                }
                _ => {}
            }
            UpdateResult::none()
        }

        Message::Backspace => {
            match state.mode {
                Mode::Menu => state.pop_query_char(),
                Mode::TextInput => {
                    if let Some(pending) = state.pending_text.as_mut() {
                        pending.input.pop();
                    }
                }
                _ => {}
            }
            UpdateResult::none()
        }

        Message::StopRecording => match state.recording.take() {
            Some(handle) => {
                state.finish(Activity::Recording);
                state.begin(Activity::SavingRecording);
                UpdateResult::action(UpdateAction::StopRecording { handle })
            }
            None => UpdateResult::none(),
        },

        // ─────────────────────────────────────────────────────────
        // Enumeration
        // ─────────────────────────────────────────────────────────
        Message::RefreshDevices { reason } => {
            if reason == RefreshReason::Manual {
                state.log.clear();
            }
            if reason.shows_progress() {
                state.begin(Activity::LoadingDevices);
            }
            UpdateResult::action(UpdateAction::LoadDevices { reason })
        }

        Message::DevicesLoaded { reason, result } => {
            if reason.shows_progress() {
                state.finish(Activity::LoadingDevices);
            }
            match result {
                Ok(devices) => {
                    state.error_banner = devices.is_empty().then(|| NO_DEVICES.to_string());
                    state.set_devices(devices);
                }
                Err(e) => {
                    debug!("device reload ({:?}) failed: {}", reason, e);
                    state.error_banner = Some(e);
                    // A background poll that fails keeps the last known list
                    if reason.shows_progress() {
                        state.set_devices(Vec::new());
                    }
                }
            }
            UpdateResult::none()
        }

        Message::AvdsLoaded { result } => {
            state.finish(Activity::LoadingAvds);
            match result {
                Ok(avds) => state.set_avds(avds),
                Err(e) => {
                    state.log.error(format!("Failed to list emulators: {e}"));
                    if state.mode == Mode::EmulatorSelect {
                        state.return_to_menu();
                    }
                }
            }
            UpdateResult::none()
        }

        Message::SettingLoaded {
            kind,
            reload,
            result,
        } => {
            state.finish(Activity::LoadingSetting);
            match result {
                Ok(info) if reload => {
                    // Only refresh the prompt the user is still looking at
                    if let Some(pending) = state.pending_text.as_mut() {
                        let same_target = matches!(
                            &pending.action,
                            TextAction::ChangeSetting { kind: k, serial }
                                if *k == kind && *serial == info.serial
                        );
                        if same_target {
                            pending.prompt = info.prompt();
                        }
                    }
                }
                Ok(info) => {
                    if state.mode == Mode::Menu {
                        let prompt = info.prompt();
                        state.enter_text_input(PendingText::new(
                            TextAction::ChangeSetting {
                                kind,
                                serial: info.serial,
                            },
                            prompt,
                        ));
                    }
                }
                Err(e) => {
                    state.log.error(format!("Failed to get current setting: {e}"));
                    if !reload {
                        state.return_to_menu();
                    }
                }
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Operation outcomes
        // ─────────────────────────────────────────────────────────
        Message::ScreenshotDone { outcome } => {
            state.finish(Activity::Screenshot);
            report(state, outcome, "Screenshot failed: ");
            UpdateResult::none()
        }

        Message::DayNightDone { outcome } => {
            state.finish(Activity::DayNight);
            report(state, outcome, "Day-night screenshots failed: ");
            UpdateResult::none()
        }

        Message::RecordingStarted { serial, result } => {
            match result {
                Ok(handle) => {
                    info!("recording started on {}", serial);
                    state.recording = Some(handle);
                }
                Err(e) => {
                    state.finish(Activity::Recording);
                    state.log.error(format!("Failed to start recording: {e}"));
                }
            }
            UpdateResult::none()
        }

        Message::ScreenRecordDone { outcome } => {
            state.finish(Activity::SavingRecording);
            report(state, outcome, "Screen recording failed: ");
            UpdateResult::none()
        }

        Message::SettingChanged {
            kind,
            serial,
            outcome,
        } => {
            state.finish(Activity::ChangingSetting);
            if report(state, outcome, "Setting change failed: ") {
                state.begin(Activity::LoadingSetting);
                return UpdateResult::action(UpdateAction::LoadSetting {
                    kind,
                    serial,
                    reload: true,
                });
            }
            UpdateResult::none()
        }

        Message::WifiConnectDone { outcome } => {
            state.finish(Activity::WifiConnect);
            reload_on_success(state, outcome, "WiFi connect failed: ")
        }

        Message::WifiDisconnectDone { outcome } => {
            state.finish(Activity::WifiDisconnect);
            reload_on_success(state, outcome, "WiFi disconnect failed: ")
        }

        Message::WifiPairDone { outcome } => {
            state.finish(Activity::WifiPair);
            reload_on_success(state, outcome, "WiFi pair failed: ")
        }

        Message::EmulatorLaunched { name, outcome } => {
            state.finish(Activity::LaunchingEmulator);
            debug!("emulator {} launch finished (success: {})", name, outcome.success);
            reload_on_success(state, outcome, "Failed to launch emulator: ")
        }

        Message::EmulatorConfigured { outcome } => {
            report(state, outcome, "");
            UpdateResult::none()
        }

        Message::LiveOutput { line } => {
            state.log.info(line);
            UpdateResult::none()
        }
    }
}

/// Log an outcome: captured lines first, then one success or error entry
///
/// Returns whether the operation succeeded.
fn report(state: &mut AppState, outcome: OperationOutcome, failure_prefix: &str) -> bool {
    for line in &outcome.captured {
        state.log.info(line);
    }
    if outcome.success {
        state.log.success(&outcome.message);
    } else {
        state
            .log
            .error(format!("{failure_prefix}{}", outcome.message));
    }
    outcome.success
}

/// Report, and reload devices when the operation changed the device set
fn reload_on_success(
    state: &mut AppState,
    outcome: OperationOutcome,
    failure_prefix: &str,
) -> UpdateResult {
    if report(state, outcome, failure_prefix) {
        UpdateResult::message(Message::RefreshDevices {
            reason: RefreshReason::AfterOperation,
        })
    } else {
        UpdateResult::none()
    }
}
