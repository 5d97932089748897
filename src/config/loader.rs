//! Configuration loading
//!
//! Precedence (highest to lowest): environment overrides, the root config
//! file, built-in defaults.

use super::{defaults, paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the root configuration with environment overrides applied
    ///
    /// The root file is created with defaults when it does not exist yet.
    /// Failing to write it is logged and otherwise ignored.
    pub fn load() -> Result<Config> {
        let path = paths::root_config_path();
        let config = if path.exists() {
            Self::load_file(&path)?
        } else {
            let config = defaults::default_config();
            if let Err(e) = Self::save(&config, &path) {
                tracing::warn!("Could not write default config: {:#}", e);
            } else {
                tracing::info!("Created default config at {}", path.display());
            }
            config
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Validate the root config file, if there is one
    ///
    /// Fails on invalid YAML, invalid value types, an empty shell command,
    /// or a zero refresh interval.
    pub fn validate() -> Result<()> {
        let path = paths::root_config_path();
        if !path.exists() {
            return Ok(());
        }
        let config = Self::load_file(&path)?;
        Self::check(&config)
    }

    fn check(config: &Config) -> Result<()> {
        if config.auto_refresh.interval == 0 {
            anyhow::bail!("autoRefresh.interval must be greater than zero");
        }
        if config.console.enabled && config.shell.command.is_empty() {
            anyhow::bail!("shell.command must not be empty while console.enabled is true");
        }
        if config.kubectl.trim().is_empty() {
            anyhow::bail!("kubectl must not be empty");
        }
        Ok(())
    }

    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(enabled) = std::env::var("KUBETRAY_AUTO_REFRESH") {
            if let Ok(val) = enabled.parse::<bool>() {
                config.auto_refresh.enabled = val;
            }
        }

        if let Ok(interval) = std::env::var("KUBETRAY_REFRESH_INTERVAL") {
            match interval.parse::<u64>() {
                Ok(val) if val > 0 => config.auto_refresh.interval = val,
                _ => tracing::warn!("Ignoring KUBETRAY_REFRESH_INTERVAL={}", interval),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Apply `change` to the config file at `path` and save it
    ///
    /// Starts from the file itself, or defaults when there is none, so env
    /// overrides never end up on disk. A file that fails to parse is left
    /// as it is and the error returned.
    pub fn update_file(path: &Path, change: impl FnOnce(&mut Config) -> Result<()>) -> Result<Config> {
        let mut config = if path.exists() {
            Self::load_file(path)?
        } else {
            Config::default()
        };
        change(&mut config)?;
        Self::save(&config, path)?;
        Ok(config)
    }

    /// [`ConfigLoader::update_file`] on the root config file
    pub fn update_root(change: impl FnOnce(&mut Config) -> Result<()>) -> Result<Config> {
        Self::update_file(&paths::root_config_path(), change)
    }
}
