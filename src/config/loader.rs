//! Configuration loader for autohop
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use crate::core::types::Address;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "autohop.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_target")]
    pub target: TargetConfig,

    #[serde(default = "default_offsets")]
    pub offsets: OffsetConfig,

    #[serde(default = "default_control")]
    pub control: ControlConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Which process and module to attach to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_process_name")]
    pub process_name: String,
    #[serde(default = "default_module_name")]
    pub module_name: String,
}

/// Offsets of the fields the poll loop touches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetConfig {
    /// Local player pointer, relative to the module base
    #[serde(default = "default_local_player")]
    pub local_player: Address,
    /// Flag word, relative to the local player structure
    #[serde(default = "default_flags")]
    pub flags: Address,
    /// Control field, relative to the module base
    #[serde(default = "default_control_offset")]
    pub control: Address,
}

/// Control values and timings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "default_engage_value")]
    pub engage_value: u32,
    #[serde(default = "default_disengage_value")]
    pub disengage_value: u32,
    #[serde(default = "default_engage_delay_ms")]
    pub engage_delay_ms: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Windows virtual-key code of the control key
    #[serde(default = "default_key")]
    pub key: u8,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Path this loader reads from
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, or defaults if the file doesn't exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from `path`, or `autohop.toml` when none is given
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let loader = ConfigLoader::new(path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH)));
    loader.load_or_default()
}

// Default functions for serde
fn default_target() -> TargetConfig {
    let defaults = default_config();
    TargetConfig {
        process_name: defaults.target.process_name,
        module_name: defaults.target.module_name,
    }
}

fn default_offsets() -> OffsetConfig {
    let defaults = default_config();
    OffsetConfig {
        local_player: defaults.offsets.local_player,
        flags: defaults.offsets.flags,
        control: defaults.offsets.control,
    }
}

fn default_control() -> ControlConfig {
    let defaults = default_config();
    ControlConfig {
        engage_value: defaults.control.engage_value,
        disengage_value: defaults.control.disengage_value,
        engage_delay_ms: defaults.control.engage_delay_ms,
        tick_interval_ms: defaults.control.tick_interval_ms,
        key: defaults.control.key,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

// Individual field defaults
fn default_process_name() -> String {
    default_config().target.process_name
}

fn default_module_name() -> String {
    default_config().target.module_name
}

fn default_local_player() -> Address {
    default_config().offsets.local_player
}

fn default_flags() -> Address {
    default_config().offsets.flags
}

fn default_control_offset() -> Address {
    default_config().offsets.control
}

fn default_engage_value() -> u32 {
    default_config().control.engage_value
}

fn default_disengage_value() -> u32 {
    default_config().control.disengage_value
}

fn default_engage_delay_ms() -> u64 {
    default_config().control.engage_delay_ms
}

fn default_tick_interval_ms() -> u64 {
    default_config().control.tick_interval_ms
}

fn default_key() -> u8 {
    default_config().control.key
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: default_target(),
            offsets: default_offsets(),
            control: default_control(),
            logging: default_logging(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.target.process_name, "csgo.exe");
        assert_eq!(config.offsets.flags, Address::new(0x104));
        assert_eq!(config.control.engage_value, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let loader = ConfigLoader::new("nonexistent.toml");
        let result = loader.load();
        assert!(matches!(result.unwrap_err(), ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_or_default() {
        let loader = ConfigLoader::new("nonexistent.toml");
        let config = loader.load_or_default().unwrap();
        assert_eq!(config.target.module_name, "client.dll");
    }

    #[test]
    fn test_broken_file_is_not_replaced_by_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[control\nengage_value = ").unwrap();

        let result = ConfigLoader::new(&config_path).load_or_default();
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("autohop.toml");

        let mut config = Config::default();
        config.offsets.control = Address::new(0x31EE_7C0);
        let loader = ConfigLoader::new(&config_path);

        loader.save(&config).unwrap();
        assert!(config_path.exists());

        let loaded = loader.load().unwrap();
        assert_eq!(loaded.offsets.control, Address::new(0x31EE_7C0));
        assert_eq!(loaded.target.process_name, config.target.process_name);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
            [offsets]
            local_player = "0xDA747C"
            flags = "0x104"

            [control]
            engage_delay_ms = 12
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.offsets.local_player, Address::new(0xDA747C));
        assert_eq!(config.control.engage_delay_ms, 12);
        // Check defaults are applied
        assert_eq!(config.offsets.control, Address::new(0x524BF4C));
        assert_eq!(config.control.disengage_value, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_config_with_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, "[target]\nprocess_name = \"hl2.exe\"\n").unwrap();

        let config = load_config(Some(&config_path)).unwrap();
        assert_eq!(config.target.process_name, "hl2.exe");
        assert_eq!(config.target.module_name, "client.dll");
    }
}
