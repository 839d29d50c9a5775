//! Colors and semantic styles
//!
//! - `palette` holds raw colors
//! - `styles` builds the styles widgets use

pub mod palette;
pub mod styles;
