//! Configuration validator for autohop
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, ControlConfig, LoggingConfig, OffsetConfig, TargetConfig};

/// Longest engage delay accepted, in milliseconds
pub const MAX_ENGAGE_DELAY_MS: u64 = 1_000;
/// Longest tick interval accepted, in milliseconds
pub const MAX_TICK_INTERVAL_MS: u64 = 1_000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_target(&config.target)?;
        Self::validate_offsets(&config.offsets)?;
        Self::validate_control(&config.control)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_target(target: &TargetConfig) -> Result<(), ConfigError> {
        if target.process_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Target process name cannot be empty".to_string(),
            ));
        }

        if target.module_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Target module name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_offsets(offsets: &OffsetConfig) -> Result<(), ConfigError> {
        if offsets.local_player.is_null() {
            return Err(ConfigError::Invalid(
                "Local player offset cannot be 0".to_string(),
            ));
        }

        if offsets.control.is_null() {
            return Err(ConfigError::Invalid(
                "Control offset cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_control(control: &ControlConfig) -> Result<(), ConfigError> {
        if control.engage_value == control.disengage_value {
            return Err(ConfigError::Invalid(format!(
                "Engage and disengage values must differ (both {})",
                control.engage_value
            )));
        }

        if control.engage_delay_ms > MAX_ENGAGE_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "Engage delay cannot exceed {} ms",
                MAX_ENGAGE_DELAY_MS
            )));
        }

        if control.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "Tick interval cannot exceed {} ms",
                MAX_TICK_INTERVAL_MS
            )));
        }

        // 0x00 and 0xFF are not assigned virtual-key codes
        if control.key == 0 || control.key == 0xFF {
            return Err(ConfigError::Invalid(format!(
                "Invalid virtual-key code: 0x{:02X}",
                control.key
            )));
        }

        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
