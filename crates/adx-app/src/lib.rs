//! adx-app - Session controller for adx
//!
//! This crate implements the TEA (The Elm Architecture) loop behind the
//! TUI: [`AppState`] is mutated only by [`handler::update`] in response to
//! [`Message`]s, and any slow work the update asks for comes back as an
//! [`UpdateAction`] that [`actions::handle_action`] runs in the background.
//! Results re-enter the loop as outcome messages.
//!
//! Also here: configuration loading, the device refresh producers, OS
//! signal handling and the external editor used to edit AVD configs.

pub mod actions;
pub mod config;
pub mod editor;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod refresh;
pub mod signals;
pub mod spawn;
pub mod state;

// Re-export primary types
pub use actions::ActionContext;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::{Message, OperationOutcome, RefreshReason};
pub use state::{Activity, AppState, Mode};

// Re-export daemon types for the TUI
pub use adx_daemon::{Avd, ConnectionType, Device};
