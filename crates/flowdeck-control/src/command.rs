//! Control commands and their acknowledgements.
//!
//! Commands arrive as JSON objects tagged by `action`:
//!
//! ```json
//! {"action": "set_voice_fx", "fx_name": "reverb", "value": 0.4}
//! {"action": "set_group_volume", "group_index": 1, "level": 0.8}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every action the control surface can trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlCommand {
    /// Master output volume.
    SetMasterVolume {
        /// Scalar volume in `[0, 1]`.
        level: f32,
    },
    /// Master output mute.
    SetMasterMute {
        /// Mute flag.
        is_muted: bool,
    },
    /// Volume of a configured mixer group.
    SetGroupVolume {
        /// Position in `audio_mixer_groups`.
        group_index: i64,
        /// Scalar volume in `[0, 1]`.
        level: f32,
    },
    /// Mute of a configured mixer group.
    SetGroupMute {
        /// Position in `audio_mixer_groups`.
        group_index: i64,
        /// Mute flag.
        is_muted: bool,
    },
    /// Default microphone mute.
    SetMicMute {
        /// Mute flag.
        is_muted: bool,
    },
    /// Default microphone volume.
    SetMicVolume {
        /// Scalar volume in `[0, 1]`.
        value: f32,
    },
    /// Replace all FX parameters with a preset's values.
    LoadVoicePreset {
        /// Position in `voice_presets`.
        preset_index: i64,
    },
    /// Change one FX parameter.
    SetVoiceFx {
        /// `pitch`, `reverb` or `echo`.
        fx_name: String,
        /// New value in `[0, 1]`.
        value: f64,
    },
    /// Press a media key.
    MediaControl {
        /// Key name, e.g. `playpause`.
        key: String,
    },
    /// Launch a stream deck program.
    RunStreamDeckAction {
        /// Program to start.
        executable: String,
    },
}

impl ControlCommand {
    /// Every action name, in table order.
    pub const ACTIONS: [&'static str; 10] = [
        "set_master_volume",
        "set_master_mute",
        "set_group_volume",
        "set_group_mute",
        "set_mic_mute",
        "set_mic_volume",
        "load_voice_preset",
        "set_voice_fx",
        "media_control",
        "run_stream_deck_action",
    ];

    /// The `action` tag of this command.
    pub fn action(&self) -> &'static str {
        match self {
            ControlCommand::SetMasterVolume { .. } => "set_master_volume",
            ControlCommand::SetMasterMute { .. } => "set_master_mute",
            ControlCommand::SetGroupVolume { .. } => "set_group_volume",
            ControlCommand::SetGroupMute { .. } => "set_group_mute",
            ControlCommand::SetMicMute { .. } => "set_mic_mute",
            ControlCommand::SetMicVolume { .. } => "set_mic_volume",
            ControlCommand::LoadVoicePreset { .. } => "load_voice_preset",
            ControlCommand::SetVoiceFx { .. } => "set_voice_fx",
            ControlCommand::MediaControl { .. } => "media_control",
            ControlCommand::RunStreamDeckAction { .. } => "run_stream_deck_action",
        }
    }

    /// Parse a command object.
    ///
    /// Distinguishes a missing or unknown `action` from a known action with
    /// bad fields.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CommandError> {
        let action = value
            .get("action")
            .and_then(serde_json::Value::as_str)
            .ok_or(CommandError::MissingAction)?;

        if !Self::ACTIONS.contains(&action) {
            return Err(CommandError::UnknownAction(action.to_string()));
        }

        serde_json::from_value(value.clone()).map_err(|source| CommandError::Malformed {
            action: action.to_string(),
            source,
        })
    }

    /// Parse a command from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CommandError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(CommandError::Syntax)?;
        Self::from_json(&value)
    }
}

/// Why a request could not be turned into a [`ControlCommand`].
#[derive(Debug, Error)]
pub enum CommandError {
    /// Not valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// No string `action` field.
    #[error("missing action")]
    MissingAction,

    /// An action outside the vocabulary.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A known action with missing or mistyped fields.
    #[error("malformed {action} command: {source}")]
    Malformed {
        /// The action tag.
        action: String,
        /// What serde rejected.
        #[source]
        source: serde_json::Error,
    },
}

/// Reply sent for each command request.
///
/// ```rust
/// use flowdeck_control::Acknowledgement;
///
/// let ack = Acknowledgement::success("set_mic_mute");
/// assert_eq!(
///     serde_json::to_string(&ack).unwrap(),
///     r#"{"status":"success","action_triggered":"set_mic_mute"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Acknowledgement {
    /// The request named an action and was accepted for processing.
    Success {
        /// The action that was triggered.
        action_triggered: String,
    },
    /// The request was rejected before dispatch.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl Acknowledgement {
    /// Acknowledge `action`.
    pub fn success(action: impl Into<String>) -> Self {
        Acknowledgement::Success {
            action_triggered: action.into(),
        }
    }

    /// Reject with `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Acknowledgement::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_every_action() {
        let requests = [
            json!({"action": "set_master_volume", "level": 0.5}),
            json!({"action": "set_master_mute", "is_muted": true}),
            json!({"action": "set_group_volume", "group_index": 0, "level": 0.5}),
            json!({"action": "set_group_mute", "group_index": 1, "is_muted": false}),
            json!({"action": "set_mic_mute", "is_muted": true}),
            json!({"action": "set_mic_volume", "value": 0.25}),
            json!({"action": "load_voice_preset", "preset_index": 2}),
            json!({"action": "set_voice_fx", "fx_name": "echo", "value": 0.3}),
            json!({"action": "media_control", "key": "nexttrack"}),
            json!({"action": "run_stream_deck_action", "executable": "obs64.exe"}),
        ];
        for (request, expected) in requests.iter().zip(ControlCommand::ACTIONS) {
            let command = ControlCommand::from_json(request).unwrap();
            assert_eq!(command.action(), expected);
        }
    }

    #[test]
    fn test_integer_level_accepted() {
        let command =
            ControlCommand::from_json(&json!({"action": "set_master_volume", "level": 1})).unwrap();
        assert_eq!(command, ControlCommand::SetMasterVolume { level: 1.0 });
    }

    #[test]
    fn test_unknown_action() {
        let err = ControlCommand::from_json(&json!({"action": "reboot"})).unwrap_err();
        assert!(matches!(err, CommandError::UnknownAction(a) if a == "reboot"));
    }

    #[test]
    fn test_missing_action() {
        assert!(matches!(
            ControlCommand::from_json(&json!({"level": 0.5})),
            Err(CommandError::MissingAction)
        ));
        assert!(matches!(
            ControlCommand::from_json(&json!({"action": 7})),
            Err(CommandError::MissingAction)
        ));
    }

    #[test]
    fn test_malformed_fields() {
        let err = ControlCommand::from_json(&json!({"action": "set_group_volume", "level": 0.5}))
            .unwrap_err();
        assert!(matches!(err, CommandError::Malformed { ref action, .. } if action == "set_group_volume"));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            ControlCommand::from_json_str("{not json"),
            Err(CommandError::Syntax(_))
        ));
    }

    #[test]
    fn test_serializes_with_action_tag() {
        let command = ControlCommand::LoadVoicePreset { preset_index: 0 };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({"action": "load_voice_preset", "preset_index": 0})
        );
    }

    #[test]
    fn test_error_ack_shape() {
        let ack = Acknowledgement::error("Invalid request");
        assert!(matches!(ack, Acknowledgement::Error { .. }));
        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            json!({"status": "error", "message": "Invalid request"})
        );
    }
}
