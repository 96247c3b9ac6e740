//! Configuration module for autohop
//!
//! Provides configuration loading, validation, and default settings.
//! Every address and control constant the poll loop uses comes from here.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults, VK_SPACE};
pub use loader::{load_config, ConfigLoader, DEFAULT_CONFIG_PATH};
pub use validator::{validate_config, ConfigValidator};

pub use loader::{Config, ControlConfig, LoggingConfig, OffsetConfig, TargetConfig};

pub use loader::ConfigError;

pub type ConfigResult<T> = Result<T, ConfigError>;
