//! # adx-core - Core Domain Types
//!
//! Foundation crate for adx. Provides error handling, logging setup, the
//! static command catalog, the fuzzy command matcher and the bounded log
//! history shown at the bottom of the TUI.
//!
//! This crate has **zero internal dependencies**.
//!
//! ## Public API
//!
//! ### Catalog (`catalog`)
//! - [`CommandId`] - Stable identifier of every menu command
//! - [`CatalogEntry`] - Immutable `{id, name, description, category}` record
//! - [`catalog()`] - The process-wide, read-only command list
//! - [`categories()`] - Catalog grouped by [`Category`] in display order
//!
//! ### Fuzzy search (`fuzzy`)
//! - [`filter_commands()`] - Rank catalog entries against a query
//!
//! ### Log history (`history`)
//! - [`LogHistory`] - FIFO ring of the most recent [`LogEntry`] values
//! - [`Severity`] - Success / Error / Info
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! ```rust
//! use adx_core::prelude::*;
//! ```

pub mod catalog;
pub mod error;
pub mod fuzzy;
pub mod history;
pub mod logging;

/// Prelude for common imports used throughout all adx crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use catalog::{catalog, categories, CatalogEntry, Category, CommandId};
pub use error::{Error, Result, ResultExt};
pub use fuzzy::filter_commands;
pub use history::{LogEntry, LogHistory, Severity, DEFAULT_HISTORY_CAPACITY};
