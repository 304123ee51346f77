//! Integration test: Config serialization round-trip.
//!
//! Verifies that Config can be serialized to TOML, written to a file, read
//! back, and deserialized with all fields preserved. Also tests serde
//! default behavior for partial configs.

use std::fs;

use readout::app::config::{load_config_from, save_config_to, Config};

/// Full round-trip: default Config → TOML → file → TOML → Config.
#[test]
fn config_save_load_roundtrip() {
    let dir = std::env::temp_dir().join("readout_integ_config_roundtrip");
    let _ = fs::create_dir_all(&dir);
    let path = dir.join("config.toml");

    let original = Config::default();
    save_config_to(&original, &path).expect("save");
    let loaded = load_config_from(&path).expect("load");

    assert_eq!(loaded.voice, original.voice);
    assert_eq!(loaded.rate, original.rate);
    assert_eq!(loaded.volume, original.volume);
    assert_eq!(loaded.local_command, original.local_command);
    assert_eq!(loaded.azure_region, original.azure_region);
    assert_eq!(loaded.azure_key, original.azure_key);
    assert_eq!(loaded.azure_voice, original.azure_voice);
    assert_eq!(loaded.audio_format, original.audio_format);
    assert_eq!(loaded.azure_timeout_secs, original.azure_timeout_secs);

    let _ = fs::remove_file(&path);
    let _ = fs::remove_dir(&dir);
}

/// Custom config preserves non-default values through round-trip.
#[test]
fn config_custom_values_roundtrip() {
    let original = Config {
        voice: Some("English (Great Britain)".to_string()),
        rate: -4,
        volume: 70,
        local_command: "/usr/local/bin/espeak-ng".to_string(),
        azure_region: Some("northeurope".to_string()),
        azure_key: Some("0123456789abcdef".to_string()),
        azure_voice: "en-GB-SoniaNeural".to_string(),
        audio_format: "audio-48khz-192kbitrate-mono-mp3".to_string(),
        azure_timeout_secs: 12,
    };

    let toml_str = toml::to_string_pretty(&original).expect("serialize");
    let loaded: Config = toml::from_str(&toml_str).expect("deserialize");

    assert_eq!(loaded.voice, original.voice);
    assert_eq!(loaded.rate, -4);
    assert_eq!(loaded.volume, 70);
    assert_eq!(loaded.local_command, original.local_command);
    assert_eq!(loaded.azure_region, original.azure_region);
    assert_eq!(loaded.azure_key, original.azure_key);
    assert_eq!(loaded.azure_voice, original.azure_voice);
    assert_eq!(loaded.audio_format, original.audio_format);
    assert_eq!(loaded.azure_timeout_secs, 12);
}

/// An empty file yields all defaults.
#[test]
fn config_empty_file_uses_defaults() {
    let loaded: Config = toml::from_str("").expect("deserialize");
    let default = Config::default();
    assert_eq!(loaded.rate, default.rate);
    assert_eq!(loaded.volume, default.volume);
    assert_eq!(loaded.azure_voice, default.azure_voice);
    assert_eq!(loaded.audio_format, default.audio_format);
}

/// Loading validates: out-of-range values are clamped.
#[test]
fn config_load_clamps_values() {
    let dir = std::env::temp_dir().join("readout_integ_config_clamp");
    let _ = fs::create_dir_all(&dir);
    let path = dir.join("config.toml");
    fs::write(&path, "rate = 25\nvolume = 200\nazure_timeout_secs = 9000\n").expect("write");

    let loaded = load_config_from(&path).expect("load");
    assert_eq!(loaded.rate, 10);
    assert_eq!(loaded.volume, 100);
    assert_eq!(loaded.azure_timeout_secs, 600);

    let _ = fs::remove_file(&path);
    let _ = fs::remove_dir(&dir);
}

/// A malformed file is an error naming the file.
#[test]
fn config_malformed_file_is_error() {
    let dir = std::env::temp_dir().join("readout_integ_config_bad");
    let _ = fs::create_dir_all(&dir);
    let path = dir.join("config.toml");
    fs::write(&path, "rate = \"fast\"\n").expect("write");

    let err = load_config_from(&path).expect_err("should fail");
    assert!(format!("{:#}", err).contains("config.toml"));

    let _ = fs::remove_file(&path);
    let _ = fs::remove_dir(&dir);
}
