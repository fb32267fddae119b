//! Preset identity.
//!
//! The live parameters "are" a preset only when every field is exactly
//! equal to that preset's values. There is no tolerance: nudging a value by
//! any amount leaves every preset.

use std::fmt;

use flowdeck_config::{FxParameterSet, Preset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Index of the first preset whose values equal `current`, in configured
/// order.
pub fn match_preset(current: &FxParameterSet, presets: &[Preset]) -> Option<usize> {
    presets.iter().position(|preset| preset.values == *current)
}

/// The matched preset, serialized as its index or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivePreset(pub Option<usize>);

impl ActivePreset {
    /// No preset matches.
    pub const NONE: ActivePreset = ActivePreset(None);

    /// Match `current` against `presets`.
    pub fn find(current: &FxParameterSet, presets: &[Preset]) -> Self {
        ActivePreset(match_preset(current, presets))
    }

    /// The index, if any.
    pub fn index(self) -> Option<usize> {
        self.0
    }

    /// Wire form: the index, or `-1`.
    pub fn as_i64(self) -> i64 {
        self.0.and_then(|i| i64::try_from(i).ok()).unwrap_or(-1)
    }
}

impl From<Option<usize>> for ActivePreset {
    fn from(index: Option<usize>) -> Self {
        ActivePreset(index)
    }
}

impl fmt::Display for ActivePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

impl Serialize for ActivePreset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for ActivePreset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(ActivePreset(usize::try_from(raw).ok()))
    }
}
