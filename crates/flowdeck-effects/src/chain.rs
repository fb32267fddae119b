//! The voice chain: reverb → echo → pitch shift.

use flowdeck_core::{Effect, EffectUnit};

use crate::{Echo, EchoSettings, PitchSettings, PitchShifter, Reverb, ReverbSettings};

/// Settings for every stage of a [`VoiceChain`].
///
/// The default is the chain's resting state: a small room, no echo and no
/// pitch shift.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoiceChainSettings {
    /// Reverb stage.
    pub reverb: ReverbSettings,
    /// Echo stage.
    pub echo: EchoSettings,
    /// Pitch stage.
    pub pitch: PitchSettings,
}

/// Fixed-order voice effect chain.
///
/// Each stage owns its own state; the chain only routes samples between
/// them and fans settings out.
#[derive(Debug, Clone)]
pub struct VoiceChain {
    reverb: Reverb,
    echo: Echo,
    pitch: PitchShifter,
}

impl VoiceChain {
    /// Create a chain at `sample_rate` with default settings.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            reverb: Reverb::new(sample_rate),
            echo: Echo::new(sample_rate),
            pitch: PitchShifter::new(sample_rate),
        }
    }
}

impl Effect for VoiceChain {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let x = self.reverb.process(input);
        let x = self.echo.process(x);
        self.pitch.process(x)
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        self.reverb.process_block(input, output);
        self.echo.process_block_inplace(output);
        self.pitch.process_block_inplace(output);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.reverb.set_sample_rate(sample_rate);
        self.echo.set_sample_rate(sample_rate);
        self.pitch.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.reverb.reset();
        self.echo.reset();
        self.pitch.reset();
    }

    fn latency_samples(&self) -> usize {
        self.reverb.latency_samples() + self.echo.latency_samples() + self.pitch.latency_samples()
    }
}

impl EffectUnit for VoiceChain {
    type Settings = VoiceChainSettings;

    fn update_parameters(&mut self, settings: &VoiceChainSettings) {
        self.reverb.update_parameters(&settings.reverb);
        self.echo.update_parameters(&settings.echo);
        self.pitch.update_parameters(&settings.pitch);
    }

    fn settings(&self) -> VoiceChainSettings {
        VoiceChainSettings {
            reverb: self.reverb.settings(),
            echo: self.echo.settings(),
            pitch: self.pitch.settings(),
        }
    }
}
