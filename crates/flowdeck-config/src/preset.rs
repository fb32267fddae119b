//! Named voice presets.

use serde::{Deserialize, Serialize};

use crate::fx::FxParameterSet;

/// A named, complete FX parameter set.
///
/// Presets are loaded once with the app config and never change afterwards.
/// Their position in the configured list is their identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name.
    pub name: String,

    /// Parameter values applied when the preset is loaded.
    #[serde(default)]
    pub values: FxParameterSet,
}

impl Preset {
    /// Create a preset.
    pub fn new(name: impl Into<String>, values: FxParameterSet) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_values() {
        let preset: Preset =
            serde_json::from_str(r#"{"name": "Robot", "values": {"pitch": 0.25}}"#).unwrap();
        assert_eq!(preset.name, "Robot");
        assert_eq!(preset.values.pitch, 0.25);
        assert_eq!(preset.values.reverb, 0.0);
    }

    #[test]
    fn test_missing_values_take_defaults() {
        let preset: Preset = serde_json::from_str(r#"{"name": "Plain"}"#).unwrap();
        assert_eq!(preset.values, FxParameterSet::default());
    }

    #[test]
    fn test_toml_form() {
        let preset: Preset = toml::from_str(
            r#"
name = "Cave"

[values]
pitch = 0.5
reverb = 0.9
echo = 0.5
"#,
        )
        .unwrap();
        assert_eq!(preset.values.reverb, 0.9);
        assert_eq!(preset.values.echo, 0.5);
    }
}
