//! Configuration for kubetray
//!
//! One YAML file in the config directory, created with defaults on first
//! run, with a few environment variable overrides on top.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::Config;

/// Keys accepted by [`get_config_value`] and [`set_config_value`]
pub const CONFIG_KEYS: &[&str] = &[
    "autoRefresh.enabled",
    "autoRefresh.interval",
    "shell.command",
    "console.enabled",
    "kubectl",
];

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "autoRefresh.enabled" => Ok(config.auto_refresh.enabled.to_string()),
        "autoRefresh.interval" => Ok(config.auto_refresh.interval.to_string()),
        "shell.command" => Ok(config.shell.command.join(" ")),
        "console.enabled" => Ok(config.console.enabled.to_string()),
        "kubectl" => Ok(config.kubectl.clone()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "autoRefresh.enabled" => {
            config.auto_refresh.enabled = value
                .parse()
                .context("autoRefresh.enabled must be 'true' or 'false'")?;
        }
        "autoRefresh.interval" => {
            let interval: u64 = value
                .parse()
                .context("autoRefresh.interval must be a number of seconds")?;
            if interval == 0 {
                return Err(anyhow::anyhow!("autoRefresh.interval must be greater than zero"));
            }
            config.auto_refresh.interval = interval;
        }
        "shell.command" => {
            // YAML array or whitespace-separated words
            let argv: Vec<String> = if value.trim_start().starts_with('[') {
                serde_yaml::from_str(value)
                    .context("shell.command must be a YAML array (e.g., ['alacritty', '-e', 'bash'])")?
            } else {
                value.split_whitespace().map(str::to_string).collect()
            };
            if argv.is_empty() {
                return Err(anyhow::anyhow!("shell.command must not be empty"));
            }
            config.shell.command = argv;
        }
        "console.enabled" => {
            config.console.enabled = value
                .parse()
                .context("console.enabled must be 'true' or 'false'")?;
        }
        "kubectl" => {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("kubectl must not be empty"));
            }
            config.kubectl = value.to_string();
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_can_be_read() {
        let config = Config::default();
        for key in CONFIG_KEYS {
            assert!(get_config_value(&config, key).is_ok(), "{}", key);
        }
        assert!(get_config_value(&config, "readOnly").is_err());
    }

    #[test]
    fn test_set_shell_command_forms() {
        let mut config = Config::default();
        set_config_value(&mut config, "shell.command", "['wezterm', 'start']").unwrap();
        assert_eq!(config.shell.command, vec!["wezterm", "start"]);

        set_config_value(&mut config, "shell.command", "alacritty -e bash").unwrap();
        assert_eq!(config.shell.command, vec!["alacritty", "-e", "bash"]);

        assert!(set_config_value(&mut config, "shell.command", "  ").is_err());
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(set_config_value(&mut config, "autoRefresh.enabled", "yes").is_err());
        assert!(set_config_value(&mut config, "autoRefresh.interval", "0").is_err());
        set_config_value(&mut config, "autoRefresh.interval", "120").unwrap();
        assert_eq!(config.auto_refresh.interval, 120);
    }
}
