//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod config;
mod contexts;
mod logging;
mod version;

pub use config::{ConfigSubcommand, handle_config_command};
pub use contexts::handle_contexts_command;
pub use logging::init_logging;
pub use version::display_version;
