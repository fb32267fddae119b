//! Room reverb.
//!
//! Freeverb topology: eight parallel lowpass-feedback combs into four
//! series allpasses. Only the room size is exposed; damping and the wet and
//! dry levels are fixed at the voice defaults (damping 0.5, wet 0.33,
//! dry 0.4).

use flowdeck_core::{AllpassFilter, CombFilter, Effect, EffectUnit, SmoothedParam};

/// Comb loop lengths at 44.1 kHz. Mutually prime to spread resonances.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass loop lengths at 44.1 kHz.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

const REFERENCE_RATE: f32 = 44100.0;

const INPUT_GAIN: f32 = 0.015;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const DAMP_SCALE: f32 = 0.4;
const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 2.0;

const DAMPING: f32 = 0.5;
const WET_LEVEL: f32 = 0.33;
const DRY_LEVEL: f32 = 0.4;

fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    ((samples as f32 * target_rate / REFERENCE_RATE).round() as usize).max(1)
}

/// Reverb parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    /// Room size in `[0, 1]`. Larger rooms ring longer.
    pub room_size: f32,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self { room_size: 0.1 }
    }
}

/// Freeverb-style room reverb.
///
/// ```rust
/// use flowdeck_core::{Effect, EffectUnit};
/// use flowdeck_effects::{Reverb, ReverbSettings};
///
/// let mut reverb = Reverb::new(48000.0);
/// reverb.update_parameters(&ReverbSettings { room_size: 0.6 });
/// let out = reverb.process(0.25);
/// assert!(out.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
    room_size: SmoothedParam,
    cached_room: f32,
}

impl Reverb {
    /// Create a reverb at `sample_rate` with the default room size.
    pub fn new(sample_rate: f32) -> Self {
        let defaults = ReverbSettings::default();
        let mut reverb = Self {
            combs: build_combs(sample_rate),
            allpasses: build_allpasses(sample_rate),
            room_size: SmoothedParam::with_config(defaults.room_size, sample_rate, 20.0),
            cached_room: -1.0,
        };
        reverb.update_comb_params();
        reverb
    }

    /// Room size currently being smoothed towards.
    pub fn room_size(&self) -> f32 {
        self.room_size.target()
    }

    /// Loop gain shared by all combs for the current room size.
    fn comb_feedback(&self) -> f32 {
        self.cached_room * ROOM_SCALE + ROOM_OFFSET
    }

    fn update_comb_params(&mut self) {
        let room = self.room_size.get();
        if (room - self.cached_room).abs() < 1e-4 {
            return;
        }
        self.cached_room = room;

        let feedback = room * ROOM_SCALE + ROOM_OFFSET;
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
            comb.set_damp(DAMPING * DAMP_SCALE);
        }
    }
}

fn build_combs(sample_rate: f32) -> [CombFilter; 8] {
    core::array::from_fn(|i| CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i], sample_rate)))
}

fn build_allpasses(sample_rate: f32) -> [AllpassFilter; 4] {
    core::array::from_fn(|i| {
        let mut ap = AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i], sample_rate));
        ap.set_feedback(0.5);
        ap
    })
}

impl Effect for Reverb {
    fn process(&mut self, input: f32) -> f32 {
        self.room_size.advance();
        self.update_comb_params();

        let driven = input * INPUT_GAIN;
        let mut wet = 0.0f32;
        for comb in &mut self.combs {
            wet += comb.process(driven);
        }
        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }

        input * DRY_LEVEL * DRY_SCALE + wet * WET_LEVEL * WET_SCALE
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.combs = build_combs(sample_rate);
        self.allpasses = build_allpasses(sample_rate);
        self.room_size.set_sample_rate(sample_rate);
        self.cached_room = -1.0;
        self.update_comb_params();
    }

    fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
        self.room_size.snap_to_target();
        self.cached_room = -1.0;
        self.update_comb_params();
    }
}

impl EffectUnit for Reverb {
    type Settings = ReverbSettings;

    fn update_parameters(&mut self, settings: &ReverbSettings) {
        self.room_size.set_target(settings.room_size.clamp(0.0, 1.0));
    }

    fn settings(&self) -> ReverbSettings {
        ReverbSettings {
            room_size: self.room_size.target(),
        }
    }
}
