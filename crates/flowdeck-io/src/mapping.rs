//! FX parameters → voice chain settings.
//!
//! | parameter | stage | law |
//! |---|---|---|
//! | `reverb` | reverb room size | identity |
//! | `echo` | echo delay | `echo * 0.5` seconds |
//! | `echo` | echo mix | `1.0` above [`ECHO_GATE_THRESHOLD`], else `0.0` |
//! | `pitch` | pitch shift | `(pitch - 0.5) * 24` semitones |

use flowdeck_config::FxParameterSet;
use flowdeck_effects::{EchoSettings, PitchSettings, ReverbSettings, VoiceChainSettings};

/// Echo values at or below this leave the echo fully dry.
pub const ECHO_GATE_THRESHOLD: f64 = 0.05;

/// Delay time at `echo = 1.0`.
pub const MAX_ECHO_SECONDS: f64 = 0.5;

/// Semitone span of the full pitch range (`-12..=+12` around the centre).
pub const PITCH_RANGE_SEMITONES: f64 = 24.0;

/// Pitch value that leaves the voice unshifted.
pub const PITCH_CENTRE: f64 = 0.5;

// Parameters stay f64 up to here so the gate and the laws see the exact
// stored value; the DSP settings are f32.

/// Semitones for a `pitch` value.
#[inline]
pub fn pitch_semitones(pitch: f64) -> f32 {
    ((pitch - PITCH_CENTRE) * PITCH_RANGE_SEMITONES) as f32
}

/// Echo delay in seconds for an `echo` value.
#[inline]
pub fn echo_delay_seconds(echo: f64) -> f32 {
    (echo * MAX_ECHO_SECONDS) as f32
}

/// Echo wet proportion for an `echo` value.
#[inline]
pub fn echo_mix(echo: f64) -> f32 {
    if echo > ECHO_GATE_THRESHOLD { 1.0 } else { 0.0 }
}

/// Settings for every stage of the voice chain. Echo feedback is always 0.
pub fn chain_settings(fx: &FxParameterSet) -> VoiceChainSettings {
    VoiceChainSettings {
        reverb: ReverbSettings {
            room_size: fx.reverb as f32,
        },
        echo: EchoSettings {
            delay_seconds: echo_delay_seconds(fx.echo),
            feedback: 0.0,
            mix: echo_mix(fx.echo),
        },
        pitch: PitchSettings {
            semitones: pitch_semitones(fx.pitch),
        },
    }
}
