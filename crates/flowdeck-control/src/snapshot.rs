//! State snapshots for the control surface.
//!
//! A snapshot is built fresh for every query from the store, the preset
//! matcher and the audio surface. Surface failures never fail the
//! snapshot; each piece falls back to a neutral value instead.

use std::sync::Arc;

use flowdeck_config::{AppConfig, FxParameterSet};
use serde::{Deserialize, Serialize};

use crate::matcher::ActivePreset;
use crate::store::FxStore;
use crate::surface::{AudioSurface, ChannelState};

/// Master and per-group mixer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioState {
    /// Master output.
    pub master: ChannelState,
    /// One entry per configured group, in order. Groups with no running
    /// app report [`ChannelState::NO_SESSION`].
    pub groups: Vec<ChannelState>,
}

/// Microphone and voice FX state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceState {
    /// Microphone mute.
    pub mic_mute: bool,
    /// Microphone volume.
    pub mic_level: f32,
    /// Preset the live parameters match, or `-1`.
    pub active_preset: ActivePreset,
    /// Live FX parameters.
    pub fx: FxParameterSet,
}

/// Point-in-time view of everything the control surface displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Mixer state.
    pub audio: AudioState,
    /// Voice state.
    pub voice: VoiceState,
}

/// Builds [`Snapshot`]s.
pub struct SnapshotAssembler {
    store: FxStore,
    surface: Arc<dyn AudioSurface>,
    config: Arc<AppConfig>,
}

impl SnapshotAssembler {
    /// Assembler reading `store` and `surface`, with groups and presets from
    /// `config`.
    pub fn new(store: FxStore, surface: Arc<dyn AudioSurface>, config: Arc<AppConfig>) -> Self {
        Self {
            store,
            surface,
            config,
        }
    }

    /// Build a snapshot. May block on the surface.
    pub fn assemble(&self) -> Snapshot {
        let master = self.surface.master_state().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "master query failed");
            ChannelState::default()
        });

        let groups = self
            .config
            .audio_mixer_groups
            .iter()
            .map(|group| match self.surface.group_state(&group.apps) {
                Ok(Some(state)) => state,
                Ok(None) => ChannelState::NO_SESSION,
                Err(e) => {
                    tracing::debug!(group = %group.name, error = %e, "group query failed");
                    ChannelState::NO_SESSION
                }
            })
            .collect();

        let mic = self.surface.mic_state().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "mic query failed");
            ChannelState::default()
        });

        let fx = self.store.read();
        let active_preset = ActivePreset::find(&fx, &self.config.voice_presets);

        Snapshot {
            audio: AudioState { master, groups },
            voice: VoiceState {
                mic_mute: mic.muted,
                mic_level: mic.level,
                active_preset,
                fx,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use flowdeck_config::{FxParam, MixerGroup, Preset};
    use serde_json::json;

    fn config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            voice_presets: vec![
                Preset::new("Normal", FxParameterSet::new(0.5, 0.25, 0.0).unwrap()),
                Preset::new("Deep", FxParameterSet::new(0.25, 0.5, 0.0).unwrap()),
            ],
            audio_mixer_groups: vec![
                MixerGroup {
                    name: "Music".to_string(),
                    apps: vec!["Spotify.exe".to_string()],
                },
                MixerGroup {
                    name: "Games".to_string(),
                    apps: vec!["game.exe".to_string()],
                },
            ],
            ..AppConfig::default()
        })
    }

    fn assembler(surface: Arc<MemorySurface>) -> SnapshotAssembler {
        let config = config();
        SnapshotAssembler::new(FxStore::new(config.initial_fx()), surface, config)
    }

    #[test]
    fn test_live_and_missing_groups() {
        let surface = Arc::new(MemorySurface::new().with_session(
            "Spotify.exe",
            ChannelState {
                level: 0.25,
                muted: true,
            },
        ));
        let snapshot = assembler(surface).assemble();
        assert_eq!(
            snapshot.audio.groups,
            [
                ChannelState {
                    level: 0.25,
                    muted: true
                },
                ChannelState::NO_SESSION
            ]
        );
    }

    #[test]
    fn test_active_preset_tracks_store() {
        let assembler = assembler(Arc::new(MemorySurface::new()));
        assert_eq!(assembler.assemble().voice.active_preset, ActivePreset(Some(0)));

        assembler.store.write_partial(FxParam::Reverb, 0.2).unwrap();
        let snapshot = assembler.assemble();
        assert_eq!(snapshot.voice.active_preset, ActivePreset::NONE);
        assert_eq!(snapshot.voice.fx.reverb, 0.2);
    }

    #[test]
    fn test_surface_failure_falls_back() {
        let surface = Arc::new(MemorySurface::new().with_session("game.exe", ChannelState::new(0.5)));
        surface.set_failing(true);
        let snapshot = assembler(surface).assemble();

        assert_eq!(snapshot.audio.master, ChannelState::new(0.0));
        assert_eq!(snapshot.audio.groups, [ChannelState::NO_SESSION; 2]);
        assert!(!snapshot.voice.mic_mute);
        assert_eq!(snapshot.voice.mic_level, 0.0);
        assert_eq!(snapshot.voice.active_preset, ActivePreset(Some(0)));
    }

    #[test]
    fn test_json_shape() {
        let surface = Arc::new(MemorySurface::new());
        let value = serde_json::to_value(assembler(surface).assemble()).unwrap();
        assert_eq!(
            value,
            json!({
                "audio": {
                    "master": {"level": 1.0, "muted": false},
                    "groups": [
                        {"level": -1.0, "muted": false},
                        {"level": -1.0, "muted": false}
                    ]
                },
                "voice": {
                    "mic_mute": false,
                    "mic_level": 1.0,
                    "active_preset": 0,
                    "fx": {"pitch": 0.5, "reverb": 0.25, "echo": 0.0}
                }
            })
        );
    }
}
