//! Application module
//!
//! TUI state over the shared menu, split into core state, key handling and
//! rendering.

mod core;
mod events;
mod rendering;

pub use self::core::*;
