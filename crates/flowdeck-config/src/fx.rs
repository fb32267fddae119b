//! FX parameter names and the parameter set that drives the voice chain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three FX parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FxParam {
    /// Pitch shift. 0.5 is neutral.
    Pitch,
    /// Reverb room size.
    Reverb,
    /// Echo amount.
    Echo,
}

impl FxParam {
    /// All parameters in storage order.
    pub const ALL: [FxParam; 3] = [FxParam::Pitch, FxParam::Reverb, FxParam::Echo];

    /// Name used in commands and the persisted state file.
    pub fn as_str(self) -> &'static str {
        match self {
            FxParam::Pitch => "pitch",
            FxParam::Reverb => "reverb",
            FxParam::Echo => "echo",
        }
    }
}

impl fmt::Display for FxParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name is not one of `pitch`, `reverb`, `echo`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fx parameter: {0}")]
pub struct UnknownFxParam(pub String);

impl FromStr for FxParam {
    type Err = UnknownFxParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pitch" => Ok(FxParam::Pitch),
            "reverb" => Ok(FxParam::Reverb),
            "echo" => Ok(FxParam::Echo),
            other => Err(UnknownFxParam(other.to_string())),
        }
    }
}

/// A value that cannot be stored in an [`FxParameterSet`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxValueError {
    /// NaN or infinite.
    #[error("{param} value is not finite")]
    NonFinite {
        /// Parameter the value was meant for.
        param: FxParam,
    },

    /// Finite but outside `[0, 1]`.
    #[error("{param} value {value} outside [0, 1]")]
    OutOfRange {
        /// Parameter the value was meant for.
        param: FxParam,
        /// The rejected value.
        value: f64,
    },
}

/// Check that `value` is storable for `param`.
///
/// Values are never clamped: anything non-finite or outside `[0, 1]` is
/// rejected so that preset matching compares only well-formed values.
pub fn check_value(param: FxParam, value: f64) -> Result<f64, FxValueError> {
    if !value.is_finite() {
        Err(FxValueError::NonFinite { param })
    } else if !(0.0..=1.0).contains(&value) {
        Err(FxValueError::OutOfRange { param, value })
    } else {
        Ok(value)
    }
}

fn default_pitch() -> f64 {
    0.5
}

/// The complete set of FX parameters.
///
/// Serializes as the flat object `{"pitch": .., "reverb": .., "echo": ..}`.
/// Missing keys take their defaults (pitch 0.5, reverb and echo 0.0);
/// unknown keys are rejected. Equality is exact, field by field.
///
/// ```rust
/// use flowdeck_config::{FxParam, FxParameterSet};
///
/// let set: FxParameterSet = serde_json::from_str(r#"{"reverb": 0.3}"#).unwrap();
/// assert_eq!(set.get(FxParam::Pitch), 0.5);
/// assert_eq!(set.get(FxParam::Reverb), 0.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FxParameterSet {
    /// Pitch shift, 0.5 neutral.
    #[serde(default = "default_pitch")]
    pub pitch: f64,
    /// Reverb room size.
    #[serde(default)]
    pub reverb: f64,
    /// Echo amount.
    #[serde(default)]
    pub echo: f64,
}

impl Default for FxParameterSet {
    fn default() -> Self {
        Self {
            pitch: default_pitch(),
            reverb: 0.0,
            echo: 0.0,
        }
    }
}

impl FxParameterSet {
    /// Build a set, validating every field.
    pub fn new(pitch: f64, reverb: f64, echo: f64) -> Result<Self, FxValueError> {
        let set = Self { pitch, reverb, echo };
        set.validate()?;
        Ok(set)
    }

    /// Value of `param`.
    pub fn get(&self, param: FxParam) -> f64 {
        match param {
            FxParam::Pitch => self.pitch,
            FxParam::Reverb => self.reverb,
            FxParam::Echo => self.echo,
        }
    }

    /// Replace one field. The set is unchanged on error.
    pub fn set(&mut self, param: FxParam, value: f64) -> Result<(), FxValueError> {
        let value = check_value(param, value)?;
        match param {
            FxParam::Pitch => self.pitch = value,
            FxParam::Reverb => self.reverb = value,
            FxParam::Echo => self.echo = value,
        }
        Ok(())
    }

    /// Copy with one field replaced.
    pub fn with(mut self, param: FxParam, value: f64) -> Result<Self, FxValueError> {
        self.set(param, value)?;
        Ok(self)
    }

    /// Check every field; reports the first bad one.
    pub fn validate(&self) -> Result<(), FxValueError> {
        for param in FxParam::ALL {
            check_value(param, self.get(param))?;
        }
        Ok(())
    }

    /// Iterate `(param, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (FxParam, f64)> + '_ {
        FxParam::ALL.into_iter().map(|p| (p, self.get(p)))
    }
}
