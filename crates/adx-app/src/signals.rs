//! OS signal handling: SIGINT/SIGTERM end the session like Ctrl+C

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use adx_core::prelude::*;

use crate::message::Message;

/// Spawn a task that turns the first termination signal into [`Message::Quit`]
pub fn spawn_signal_handler(msg_tx: mpsc::Sender<Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(name) => {
                info!("received {}, shutting down", name);
                let _ = msg_tx.send(Message::Quit).await;
            }
            Err(e) => error!("signal handler unavailable: {}", e),
        }
    })
}

/// Wait for a termination signal and return its name
async fn wait_for_signal() -> Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::terminal(format!("cannot listen for SIGINT: {e}")))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::terminal(format!("cannot listen for SIGTERM: {e}")))?;

        let name = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        };
        Ok(name)
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::terminal(format!("cannot listen for Ctrl+C: {e}")))?;
        Ok("Ctrl+C")
    }
}
