//! Config validation.
//!
//! Parsing already enforces the shape of the file; this pass checks the
//! values. Every problem is collected so a single `check` run reports them
//! all.

use thiserror::Error;

use crate::app_config::AppConfig;
use crate::fx::FxValueError;

/// A problem found in an otherwise well-formed config.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A preset carries a value that cannot be stored.
    #[error("preset {index} ('{name}'): {source}")]
    PresetValue {
        /// Position in `voice_presets`.
        index: usize,
        /// Preset name.
        name: String,
        /// What was wrong with the value.
        #[source]
        source: FxValueError,
    },

    /// A preset has an empty name.
    #[error("preset {0} has an empty name")]
    EmptyPresetName(usize),

    /// A mixer group has an empty name.
    #[error("mixer group {0} has an empty name")]
    EmptyGroupName(usize),

    /// A stream deck button has nothing to launch.
    #[error("stream deck button '{0}' has an empty executable")]
    EmptyExecutable(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate every preset, group and button in `config`.
///
/// Duplicate preset names and groups without apps are legal (presets are
/// identified by position, and an empty group simply never has a session)
/// but are logged at `warn`.
pub fn validate_config(config: &AppConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    for (index, preset) in config.voice_presets.iter().enumerate() {
        if preset.name.trim().is_empty() {
            errors.push(ValidationError::EmptyPresetName(index));
        }
        if let Err(source) = preset.values.validate() {
            errors.push(ValidationError::PresetValue {
                index,
                name: preset.name.clone(),
                source,
            });
        }
        if config.voice_presets[..index]
            .iter()
            .any(|earlier| earlier.name == preset.name)
        {
            tracing::warn!(index, name = %preset.name, "duplicate preset name");
        }
    }

    for (index, group) in config.audio_mixer_groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            errors.push(ValidationError::EmptyGroupName(index));
        }
        if group.apps.is_empty() {
            tracing::warn!(index, name = %group.name, "mixer group lists no apps");
        }
    }

    for button in &config.stream_deck_buttons {
        if button.executable.trim().is_empty() {
            errors.push(ValidationError::EmptyExecutable(button.label.clone()));
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
