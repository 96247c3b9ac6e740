//! Loading, validating and resolving a configuration file

use autohop::config::{load_config, validate_config, ConfigError, ConfigLoader};
use autohop::core::types::Address;
use autohop::hop::PollConfig;
use pretty_assertions::assert_eq;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_file_to_poll_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("autohop.toml");
    fs::write(
        &path,
        r#"
[target]
process_name = "csgo.exe"
module_name = "client_panorama.dll"

[offsets]
local_player = "0xD28B1C"
flags = 0x104
control = "0x51ED760"

[control]
engage_delay_ms = 8
tick_interval_ms = 2
key = 0x20

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    validate_config(&config).unwrap();

    let base = Address::new(0x2400_0000);
    let resolved = PollConfig::resolve(&config, base).unwrap();
    assert_eq!(resolved.local_player_ptr, Address::new(0x2400_0000 + 0xD28B1C));
    assert_eq!(resolved.control_address, Address::new(0x2400_0000 + 0x51ED760));
    assert_eq!(resolved.flags_offset, 0x104);
    assert_eq!(resolved.engage_delay, Duration::from_millis(8));
    assert_eq!(resolved.tick_interval, Duration::from_millis(2));
    assert_eq!(resolved.engage_value, 5);
    assert_eq!(resolved.disengage_value, 4);
}

#[test]
fn test_invalid_file_is_rejected_by_validation() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("autohop.toml");
    fs::write(&path, "[control]\nengage_value = 4\ndisengage_value = 4\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert!(matches!(validate_config(&config), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_saved_defaults_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new(temp_dir.path().join("saved.toml"));
    loader.save(&Default::default()).unwrap();

    let config = loader.load().unwrap();
    assert_eq!(config.offsets.local_player, Address::new(0xDEA98C));
    assert_eq!(config.control.key, 0x20);
}
