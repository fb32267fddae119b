//! Pitch shifter.
//!
//! Two read taps sweep through a short delay window at a rate set by the
//! pitch ratio: a shrinking delay reads faster than real time (pitch up), a
//! growing one slower (pitch down). The taps sit half a window apart and are
//! crossfaded with complementary `sin²` gains, so each tap is silent at the
//! moment it wraps from one end of the window to the other.
//!
//! At exactly zero semitones the wet path is faded out and the unit passes
//! its input through untouched.

use core::f32::consts::PI;

use flowdeck_core::{
    Effect, EffectUnit, InterpolatedDelay, SmoothedParam, semitones_to_ratio, wet_dry_mix,
};
use libm::{floorf, sinf};

/// Length of the sweep window.
pub const WINDOW_MS: f32 = 50.0;

/// Largest shift accepted in either direction.
pub const MAX_SEMITONES: f32 = 24.0;

/// Pitch shift parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PitchSettings {
    /// Shift in semitones, `[-24, 24]`. Zero bypasses the shifter.
    pub semitones: f32,
}

/// Two-tap rotating-delay pitch shifter.
///
/// ```rust
/// use flowdeck_core::{Effect, EffectUnit};
/// use flowdeck_effects::{PitchSettings, PitchShifter};
///
/// let mut shifter = PitchShifter::new(48000.0);
/// shifter.update_parameters(&PitchSettings { semitones: 7.0 });
/// let out = shifter.process(0.1);
/// assert!(out.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct PitchShifter {
    line: InterpolatedDelay,
    window: f32,
    phase: f32,
    semitones: SmoothedParam,
    wet: SmoothedParam,
}

impl PitchShifter {
    /// Create a bypassed shifter at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let window = window_samples(sample_rate);
        Self {
            line: InterpolatedDelay::new(window as usize + 2),
            window,
            phase: 0.0,
            semitones: SmoothedParam::with_config(0.0, sample_rate, 30.0),
            wet: SmoothedParam::with_config(0.0, sample_rate, 10.0),
        }
    }

    /// Shift currently being smoothed towards.
    pub fn semitones(&self) -> f32 {
        self.semitones.target()
    }

    /// True when the wet path is fully faded out.
    pub fn is_bypassed(&self) -> bool {
        self.wet.target() == 0.0 && self.wet.is_settled()
    }
}

fn window_samples(sample_rate: f32) -> f32 {
    floorf(WINDOW_MS / 1000.0 * sample_rate).max(4.0)
}

// Gain of a tap at `phase` through the window; zero at both ends.
#[inline]
fn tap_gain(phase: f32) -> f32 {
    let s = sinf(PI * phase);
    s * s
}

impl Effect for PitchShifter {
    fn process(&mut self, input: f32) -> f32 {
        self.line.write(input);

        let semitones = self.semitones.advance();
        let wet = self.wet.advance();
        if self.wet.target() == 0.0 && self.wet.is_settled() {
            self.wet.snap_to_target();
            return input;
        }

        let ratio = semitones_to_ratio(semitones);
        self.phase += (1.0 - ratio) / self.window;
        self.phase -= floorf(self.phase);

        let phase_b = {
            let p = self.phase + 0.5;
            p - floorf(p)
        };
        let gain_a = tap_gain(self.phase);
        let shifted = self.line.read(self.phase * self.window) * gain_a
            + self.line.read(phase_b * self.window) * (1.0 - gain_a);

        wet_dry_mix(input, shifted, wet)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.window = window_samples(sample_rate);
        self.line = InterpolatedDelay::new(self.window as usize + 2);
        self.phase = 0.0;
        self.semitones.set_sample_rate(sample_rate);
        self.wet.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.line.clear();
        self.phase = 0.0;
        self.semitones.snap_to_target();
        self.wet.snap_to_target();
    }

    fn latency_samples(&self) -> usize {
        if self.is_bypassed() {
            0
        } else {
            (self.window / 2.0) as usize
        }
    }
}

impl EffectUnit for PitchShifter {
    type Settings = PitchSettings;

    fn update_parameters(&mut self, settings: &PitchSettings) {
        let semitones = settings.semitones.clamp(-MAX_SEMITONES, MAX_SEMITONES);
        self.semitones.set_target(semitones);
        self.wet.set_target(if semitones == 0.0 { 0.0 } else { 1.0 });
    }

    fn settings(&self) -> PitchSettings {
        PitchSettings {
            semitones: self.semitones.target(),
        }
    }
}
