//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde.

use serde::{Deserialize, Serialize};

use crate::models::CommandSpec;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Periodic full passes
    #[serde(default)]
    pub auto_refresh: AutoRefreshConfig,

    /// Console launched from a context's "Launch console" action
    #[serde(default)]
    pub shell: ShellConfig,

    #[serde(default)]
    pub console: ConsoleConfig,

    /// Program used by action commands
    #[serde(default = "default_kubectl")]
    pub kubectl: String,
}

/// Auto-refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutoRefreshConfig {
    #[serde(default = "default_false")]
    pub enabled: bool,

    /// Seconds between two full passes
    #[serde(default = "default_interval")]
    pub interval: u64,
}

/// Console launcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShellConfig {
    /// Program followed by its arguments
    #[serde(default = "super::defaults::default_shell_command")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_interval() -> u64 {
    3600
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

impl Config {
    /// Console command, if consoles are enabled and one is configured
    pub fn console_command(&self) -> Option<CommandSpec> {
        if !self.console.enabled {
            return None;
        }
        CommandSpec::from_argv(&self.shell.command)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_refresh: AutoRefreshConfig::default(),
            shell: ShellConfig::default(),
            console: ConsoleConfig::default(),
            kubectl: default_kubectl(),
        }
    }
}

impl Default for AutoRefreshConfig {
    fn default() -> Self {
        Self {
            enabled: default_false(),
            interval: default_interval(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            command: super::defaults::default_shell_command(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}
