//! Message processing: the TEA update loop plus action dispatch

use tokio::sync::mpsc;

use crate::actions::{handle_action, ActionContext};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
///
/// Follow-up messages are handled in the same call; actions are
/// dispatched as they appear and report back through `msg_tx`.
pub fn process_message(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    ctx: &ActionContext,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), ctx);
        }

        msg = result.message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_key::InputKey;
    use crate::state::{Activity, Mode};
    use adx_daemon::{OpsContext, SdkPaths};
    use tempfile::tempdir;

    fn context(root: &std::path::Path) -> ActionContext {
        let sdk = SdkPaths::from_home(root.join("sdk")).with_avd_home(root.join("avd"));
        ActionContext::new(OpsContext::new(&sdk, root.join("media")), root.join("avd"))
    }

    #[tokio::test]
    async fn test_key_chain_reaches_dispatch() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());
        let (tx, mut rx) = mpsc::channel(8);
        let mut state = AppState::new();

        // Typing narrows the menu without dispatching anything
        for c in "launch".chars() {
            process_message(&mut state, Message::Key(InputKey::Char(c)), &tx, &ctx);
        }
        assert_eq!(state.search_query, "launch");
        assert!(rx.try_recv().is_err());

        process_message(&mut state, Message::Key(InputKey::Enter), &tx, &ctx);
        assert_eq!(state.mode, Mode::EmulatorSelect);
        assert!(state.is_active(Activity::LoadingAvds));

        // AVD directory does not exist: empty list, not an error
        match rx.recv().await.unwrap() {
            Message::AvdsLoaded { result } => assert_eq!(result, Ok(Vec::new())),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_quit_sets_flag() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());
        let (tx, _rx) = mpsc::channel(8);
        let mut state = AppState::new();

        process_message(&mut state, Message::Key(InputKey::CharCtrl('c')), &tx, &ctx);

        assert!(state.should_quit());
    }
}
