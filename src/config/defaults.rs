//! Default configuration values for autohop

use crate::core::types::Address;
use serde::{Deserialize, Serialize};

/// Virtual-key code of the space bar
pub const VK_SPACE: u8 = 0x20;

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub target: TargetDefaults,
    pub offsets: OffsetDefaults,
    pub control: ControlDefaults,
    pub logging: LoggingDefaults,
}

/// Default target process and module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDefaults {
    pub process_name: String,
    pub module_name: String,
}

/// Default offsets, relative to the module base or the player structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetDefaults {
    pub local_player: Address,
    pub flags: Address,
    pub control: Address,
}

/// Default control values and timings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlDefaults {
    pub engage_value: u32,
    pub disengage_value: u32,
    pub engage_delay_ms: u64,
    pub tick_interval_ms: u64,
    pub key: u8,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        target: TargetDefaults {
            process_name: "csgo.exe".to_string(),
            module_name: "client.dll".to_string(),
        },
        // Offsets change with every game build; these match one build only.
        offsets: OffsetDefaults {
            local_player: Address::new(0xDEA98C),
            flags: Address::new(0x104),
            control: Address::new(0x524BF4C),
        },
        control: ControlDefaults {
            engage_value: 5,
            disengage_value: 4,
            engage_delay_ms: 5,
            tick_interval_ms: 1,
            key: VK_SPACE,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}
