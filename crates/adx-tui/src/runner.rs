//! Main TUI runner - entry point and event loop
//!
//! Owns the terminal for the lifetime of the session:
//! - `run`: sets up producers, runs the loop, tears everything down
//! - `run_loop`: drains background messages, draws, polls keys

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use adx_app::config::Settings;
use adx_app::editor::{self, resolve_editor};
use adx_app::process::process_message;
use adx_app::{refresh, signals, ActionContext, AppState, Message, RefreshReason};
use adx_core::prelude::*;
use adx_daemon::TrackerConfig;

use crate::{event, render, terminal};

/// Run the interactive session until the user quits
pub async fn run(settings: Settings) -> Result<()> {
    terminal::install_panic_hook();

    let ctx = ActionContext::from_settings(&settings);
    let editor = resolve_editor(settings.ui.editor.as_deref());
    let mut state = AppState::with_log_capacity(settings.ui.log_history);

    let term = terminal::init()?;

    let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
    let tasks = spawn_producers(&settings, &ctx, &msg_tx);
    info!("adx started with adb at {}", ctx.ops.adb.path().display());

    process_message(
        &mut state,
        Message::RefreshDevices {
            reason: RefreshReason::Startup,
        },
        &msg_tx,
        &ctx,
    );

    let result = run_loop(term, &mut state, msg_rx, &msg_tx, &ctx, &editor);

    for task in tasks {
        task.abort();
    }
    if state.is_recording() {
        info!("discarding active recording on exit");
    }
    drop(state);

    terminal::restore();
    result
}

/// Signal handler, periodic refresh and (if enabled) the device watcher
fn spawn_producers(
    settings: &Settings,
    ctx: &ActionContext,
    msg_tx: &mpsc::Sender<Message>,
) -> Vec<JoinHandle<()>> {
    let mut tasks = vec![
        signals::spawn_signal_handler(msg_tx.clone()),
        refresh::spawn_periodic_refresh(msg_tx.clone(), settings.refresh.periodic()),
    ];

    if settings.watcher.enabled {
        let config = TrackerConfig::new(ctx.ops.adb.path())
            .with_send_timeout_ms(settings.watcher.send_timeout_ms);
        tasks.push(refresh::spawn_device_watcher(
            msg_tx.clone(),
            config,
            settings.refresh.settle(),
        ));
    } else {
        debug!("device watcher disabled by config");
    }

    tasks
}

/// Main event loop
fn run_loop(
    mut term: ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    msg_tx: &mpsc::Sender<Message>,
    ctx: &ActionContext,
    editor: &str,
) -> Result<()> {
    while !state.should_quit() {
        // Outcomes and refresh requests from background tasks
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg, msg_tx, ctx);
        }

        if let Some(request) = state.editor_request.take() {
            let (restored, result) =
                terminal::suspend_for(term, || editor::open_in_editor(&request, editor))?;
            term = restored;
            process_message(
                state,
                Message::EmulatorConfigured {
                    outcome: editor::outcome(result),
                },
                msg_tx,
                ctx,
            );
        }

        term.draw(|frame| render::view(frame, state))?;

        if let Some(message) = event::poll()? {
            process_message(state, message, msg_tx, ctx);
        }
    }

    Ok(())
}
