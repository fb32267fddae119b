//! Command dispatch.
//!
//! Each [`ControlCommand`] maps to exactly one operation: FX commands write
//! the [`FxStore`], everything else goes to the [`AudioSurface`]. Invalid
//! commands are dropped and surface failures are swallowed; both are logged
//! at `debug` and reported back as an [`Outcome`] for callers that care.

use std::sync::Arc;

use flowdeck_config::{AppConfig, FxParam, FxValueError};

use crate::command::ControlCommand;
use crate::store::FxStore;
use crate::surface::{AudioSurface, SurfaceError};

/// Why a command had no effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// `preset_index` outside the configured presets.
    PresetIndex(i64),
    /// `group_index` outside the configured mixer groups.
    GroupIndex(i64),
    /// `fx_name` is not a known parameter.
    UnknownFx(String),
    /// FX value outside `[0, 1]` or not finite.
    FxValue(FxValueError),
    /// Volume level outside `[0, 1]` or not finite.
    Level(f32),
    /// The surface reported a failure.
    Surface(SurfaceError),
}

/// Result of dispatching one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The operation ran.
    Applied,
    /// The command was dropped or the operation failed.
    Rejected(Rejection),
}

impl Outcome {
    /// True for [`Outcome::Applied`].
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

fn check_level(level: f32) -> Result<f32, Rejection> {
    if level.is_finite() && (0.0..=1.0).contains(&level) {
        Ok(level)
    } else {
        Err(Rejection::Level(level))
    }
}

fn as_index(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}

/// Validates and performs control commands.
pub struct Dispatcher {
    store: FxStore,
    surface: Arc<dyn AudioSurface>,
    config: Arc<AppConfig>,
}

impl Dispatcher {
    /// Dispatcher writing to `store` and `surface`, resolving preset and
    /// group indices against `config`.
    pub fn new(store: FxStore, surface: Arc<dyn AudioSurface>, config: Arc<AppConfig>) -> Self {
        Self {
            store,
            surface,
            config,
        }
    }

    /// The store commands write to.
    pub fn store(&self) -> &FxStore {
        &self.store
    }

    /// Perform `command`.
    pub fn dispatch(&self, command: &ControlCommand) -> Outcome {
        match self.perform(command) {
            Ok(()) => Outcome::Applied,
            Err(rejection) => {
                tracing::debug!(action = command.action(), ?rejection, "command had no effect");
                Outcome::Rejected(rejection)
            }
        }
    }

    /// Parse and perform a JSON command object.
    ///
    /// Returns `false` when the object is not a recognized command; such
    /// requests are dropped.
    pub fn dispatch_json(&self, value: &serde_json::Value) -> bool {
        match ControlCommand::from_json(value) {
            Ok(command) => {
                self.dispatch(&command);
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "dropping unrecognized command");
                false
            }
        }
    }

    /// Parse and perform a JSON command string. See [`dispatch_json`](Self::dispatch_json).
    pub fn dispatch_str(&self, json: &str) -> bool {
        match ControlCommand::from_json_str(json) {
            Ok(command) => {
                self.dispatch(&command);
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "dropping unrecognized command");
                false
            }
        }
    }

    fn perform(&self, command: &ControlCommand) -> Result<(), Rejection> {
        let surface = self.surface.as_ref();
        let result = match command {
            ControlCommand::SetMasterVolume { level } => {
                surface.set_master_volume(check_level(*level)?)
            }
            ControlCommand::SetMasterMute { is_muted } => surface.set_master_mute(*is_muted),
            ControlCommand::SetGroupVolume { group_index, level } => {
                let apps = self.group_apps(*group_index)?;
                surface.set_group_volume(apps, check_level(*level)?)
            }
            ControlCommand::SetGroupMute {
                group_index,
                is_muted,
            } => {
                let apps = self.group_apps(*group_index)?;
                surface.set_group_mute(apps, *is_muted)
            }
            ControlCommand::SetMicMute { is_muted } => surface.set_mic_mute(*is_muted),
            ControlCommand::SetMicVolume { value } => surface.set_mic_volume(check_level(*value)?),
            ControlCommand::LoadVoicePreset { preset_index } => {
                let preset = as_index(*preset_index)
                    .and_then(|i| self.config.preset(i))
                    .ok_or(Rejection::PresetIndex(*preset_index))?;
                tracing::info!(index = preset_index, name = %preset.name, "loading voice preset");
                return self.store.write_full(preset.values).map_err(Rejection::FxValue);
            }
            ControlCommand::SetVoiceFx { fx_name, value } => {
                let param: FxParam = fx_name
                    .parse()
                    .map_err(|_| Rejection::UnknownFx(fx_name.clone()))?;
                return self
                    .store
                    .write_partial(param, *value)
                    .map(|_| ())
                    .map_err(Rejection::FxValue);
            }
            ControlCommand::MediaControl { key } => surface.send_media_key(key),
            ControlCommand::RunStreamDeckAction { executable } => surface.launch(executable),
        };
        result.map_err(Rejection::Surface)
    }

    fn group_apps(&self, group_index: i64) -> Result<&[String], Rejection> {
        as_index(group_index)
            .and_then(|i| self.config.group(i))
            .map(|group| group.apps.as_slice())
            .ok_or(Rejection::GroupIndex(group_index))
    }
}
