//! Integration tests for flowdeck-config.
//!
//! Loading real files from disk in both formats.

use flowdeck_config::{AppConfig, ConfigError, FxParameterSet, Preset};
use proptest::prelude::*;
use tempfile::TempDir;

const TOML_CONFIG: &str = r#"
state_file = "fx_state.json"

[[voice_presets]]
name = "Normal"
values = { pitch = 0.5, reverb = 0.1, echo = 0.0 }

[[voice_presets]]
name = "Stadium"
values = { pitch = 0.5, reverb = 0.9, echo = 0.6 }

[[audio_mixer_groups]]
name = "Music"
apps = ["Spotify.exe", "foobar2000.exe"]

[audio_devices]
input_device_name = "USB Mic"

[[stream_deck_buttons]]
label = "Browser"
executable = "firefox"
"#;

#[test]
fn test_load_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, TOML_CONFIG).unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.voice_presets.len(), 2);
    assert_eq!(config.voice_presets[1].values.echo, 0.6);
    assert_eq!(config.audio_mixer_groups[0].apps.len(), 2);
    assert_eq!(config.audio_devices.input_device_name.as_deref(), Some("USB Mic"));
    assert_eq!(config.audio_devices.output_device_name, None);
    assert_eq!(config.state_file.as_deref(), Some(std::path::Path::new("fx_state.json")));
}

#[test]
fn test_json_and_toml_agree() {
    let dir = TempDir::new().unwrap();
    let toml_path = dir.path().join("config.toml");
    std::fs::write(&toml_path, TOML_CONFIG).unwrap();
    let from_toml = AppConfig::load(&toml_path).unwrap();

    let json_path = dir.path().join("config.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(&from_toml).unwrap()).unwrap();
    let from_json = AppConfig::load(&json_path).unwrap();

    assert_eq!(from_toml, from_json);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = AppConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ \"voice_presets\": [").unwrap();
    assert!(matches!(AppConfig::load(&path), Err(ConfigError::Json(_))));
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[[voice_presets]]\nname = \"Broken\"\nvalues = { pitch = -0.5 }\n",
    )
    .unwrap();
    let err = AppConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("Broken"), "got: {err}");
}

proptest! {
    /// Any in-range preset survives a JSON write/load cycle bit-exactly,
    /// so preset matching after a reload still works.
    #[test]
    fn preset_values_survive_json(
        pitch in 0.0f64..=1.0,
        reverb in 0.0f64..=1.0,
        echo in 0.0f64..=1.0,
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let values = FxParameterSet::new(pitch, reverb, echo).unwrap();
        let config = AppConfig {
            voice_presets: vec![Preset::new("P", values)],
            ..AppConfig::default()
        };
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        prop_assert_eq!(loaded.voice_presets[0].values, values);
    }
}
