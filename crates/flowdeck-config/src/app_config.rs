//! The application config file.
//!
//! One file describes everything the control surface can address: the voice
//! presets, the mixer groups, the audio devices for the voice stream and the
//! stream deck buttons. JSON and TOML are both accepted; the format is
//! picked from the file extension.
//!
//! ```json
//! {
//!   "voice_presets": [
//!     { "name": "Normal", "values": { "pitch": 0.5, "reverb": 0.1, "echo": 0.0 } },
//!     { "name": "Chipmunk", "values": { "pitch": 0.9, "reverb": 0.1, "echo": 0.0 } }
//!   ],
//!   "audio_mixer_groups": [
//!     { "name": "Music", "apps": ["Spotify.exe"] }
//!   ],
//!   "audio_devices": {
//!     "input_device_name": "Microphone",
//!     "output_device_name": "CABLE Input"
//!   },
//!   "stream_deck_buttons": [
//!     { "label": "OBS", "executable": "obs64.exe" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fx::FxParameterSet;
use crate::preset::Preset;
use crate::validation::validate_config;

/// A named set of applications whose sessions share a volume fader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerGroup {
    /// Display name.
    pub name: String,
    /// Process names whose audio sessions belong to the group.
    #[serde(default)]
    pub apps: Vec<String>,
}

/// Devices used by the voice stream. `None` selects the system default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevices {
    /// Capture device name (case-insensitive substring match).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_device_name: Option<String>,
    /// Playback device name (case-insensitive substring match).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_device_name: Option<String>,
}

/// A launcher button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDeckButton {
    /// Button label.
    pub label: String,
    /// Program launched when the button is pressed.
    pub executable: String,
}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Everything the control surface and voice engine are configured with.
///
/// Every section is optional and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Voice presets in display order. The index is the preset's identity.
    #[serde(default)]
    pub voice_presets: Vec<Preset>,

    /// Mixer groups in display order.
    #[serde(default)]
    pub audio_mixer_groups: Vec<MixerGroup>,

    /// Devices for the voice stream.
    #[serde(default)]
    pub audio_devices: AudioDevices,

    /// Launcher buttons.
    #[serde(default)]
    pub stream_deck_buttons: Vec<StreamDeckButton>,

    /// Where the live FX parameters are persisted, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

        let config = match format {
            ConfigFormat::Json => Self::from_json_str(&content)?,
            ConfigFormat::Toml => Self::from_toml_str(&content)?,
        };

        tracing::debug!(
            path = %path.display(),
            presets = config.voice_presets.len(),
            groups = config.audio_mixer_groups.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse and validate a TOML config.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(toml_str)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parameters the voice engine starts with: the first preset's values,
    /// or the defaults when no presets are configured.
    pub fn initial_fx(&self) -> FxParameterSet {
        self.voice_presets
            .first()
            .map(|p| p.values)
            .unwrap_or_default()
    }

    /// Preset at `index`.
    pub fn preset(&self, index: usize) -> Option<&Preset> {
        self.voice_presets.get(index)
    }

    /// Mixer group at `index`.
    pub fn group(&self, index: usize) -> Option<&MixerGroup> {
        self.audio_mixer_groups.get(index)
    }
}
