//! TUI view components

mod footer;
mod header;
mod tree;

pub use footer::*;
pub use header::*;
pub use tree::*;
