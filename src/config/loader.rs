//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use crate::discovery::DevicePattern;
use crate::payload::Variant;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "CDC_CHECK";

/// Config file name inside the platform config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file name looked up in the working directory
const LOCAL_CONFIG_FILE_NAME: &str = "cdc-check.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "CDC_CHECK_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `explicit` (the `--config` flag); must exist
    /// 2. `CDC_CHECK_CONFIG` environment variable
    /// 3. `./cdc-check.toml`
    /// 4. `<platform config dir>/cdc-check/config.toml`
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables override file values.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let config_path = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => resolve_config_path(),
        };

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Built-in defaults with environment overrides; no file is read.
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut config = Config::default();
        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self {
            config_path: None,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let cwd_config = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|path| path.exists())
}

/// Get the default config file path for creating new config files.
pub fn get_default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cdc-check").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Apply environment variable overrides to the configuration.
///
/// - `CDC_CHECK_VARIANT=verify`
/// - `CDC_CHECK_PATTERNS=/dev/ttyACM*,/dev/ttyUSB*`
/// - `CDC_CHECK_LOG_LEVEL=debug`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    let var = format!("{}_VARIANT", ENV_PREFIX);
    if let Ok(val) = std::env::var(&var) {
        config.check.variant = val
            .parse::<Variant>()
            .map_err(|e| ConfigError::env_parse(var, e))?;
    }

    if let Ok(val) = std::env::var(format!("{}_PATTERNS", ENV_PREFIX)) {
        config.discovery.patterns = val
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
        config.logging.level = val;
    }

    Ok(())
}

fn validate(config: &Config) -> ConfigResult<()> {
    for pattern in &config.discovery.patterns {
        DevicePattern::parse(pattern)
            .map_err(|e| ConfigError::validation("discovery.patterns", e.to_string()))?;
    }

    config
        .logging
        .level
        .parse::<LevelFilter>()
        .map_err(|e| ConfigError::validation("logging.level", e.to_string()))?;

    Ok(())
}
