//! Default configuration values

use super::schema::Config;

pub fn default_config() -> Config {
    Config::default()
}

/// Console launcher for the current platform
pub fn default_shell_command() -> Vec<String> {
    #[cfg(windows)]
    let argv: &[&str] = &["cmd", "/c", "wt", "-w", "0", "nt"];
    #[cfg(not(windows))]
    let argv: &[&str] = &["x-terminal-emulator"];

    argv.iter().map(|s| s.to_string()).collect()
}
