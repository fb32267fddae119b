//! Property-based tests for the voice chain.
//!
//! Any settings the render engine can produce, fed any input in [-1, 1],
//! must give finite, bounded output, and `reset` must silence the chain.

use flowdeck_core::{Effect, EffectUnit};
use flowdeck_effects::{
    EchoSettings, PitchSettings, ReverbSettings, VoiceChain, VoiceChainSettings,
};
use proptest::prelude::*;

fn settings_from(room: f32, echo: f32, semitones: f32) -> VoiceChainSettings {
    VoiceChainSettings {
        reverb: ReverbSettings { room_size: room },
        echo: EchoSettings {
            delay_seconds: echo * 0.5,
            feedback: 0.0,
            mix: if echo > 0.05 { 1.0 } else { 0.0 },
        },
        pitch: PitchSettings { semitones },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Chain output stays finite for every reachable setting.
    #[test]
    fn chain_finite_output(
        input in prop::array::uniform32(-1.0f32..=1.0f32),
        room in 0.0f32..=1.0,
        echo in 0.0f32..=1.0,
        semitones in -12.0f32..=12.0,
    ) {
        let mut chain = VoiceChain::new(48000.0);
        chain.update_parameters(&settings_from(room, echo, semitones));

        for _ in 0..256 {
            chain.process(0.0);
        }
        for &sample in &input {
            let out = chain.process(sample);
            prop_assert!(out.is_finite(), "non-finite output {} for input {}", out, sample);
        }
    }

    /// Full-scale noise through the largest room does not blow up.
    #[test]
    fn chain_bounded_output(
        input in prop::collection::vec(-1.0f32..=1.0f32, 4096),
        semitones in -12.0f32..=12.0,
    ) {
        let mut chain = VoiceChain::new(48000.0);
        chain.update_parameters(&settings_from(1.0, 1.0, semitones));
        chain.reset();

        let mut output = vec![0.0; input.len()];
        chain.process_block(&input, &mut output);
        for out in output {
            prop_assert!(out.abs() < 10.0, "output {} out of bounds", out);
        }
    }

    /// After reset a silent input gives silent output.
    #[test]
    fn chain_reset_silences(
        input in prop::collection::vec(-1.0f32..=1.0f32, 512),
        room in 0.0f32..=1.0,
        echo in 0.0f32..=1.0,
        semitones in -12.0f32..=12.0,
    ) {
        let mut chain = VoiceChain::new(48000.0);
        chain.update_parameters(&settings_from(room, echo, semitones));
        for &sample in &input {
            chain.process(sample);
        }
        chain.reset();
        for _ in 0..64 {
            prop_assert_eq!(chain.process(0.0), 0.0);
        }
    }

    /// Applied settings read back unchanged (within the clamp ranges).
    #[test]
    fn chain_settings_read_back(
        room in 0.0f32..=1.0,
        semitones in -24.0f32..=24.0,
    ) {
        let mut chain = VoiceChain::new(48000.0);
        let settings = settings_from(room, 0.0, semitones);
        chain.update_parameters(&settings);
        let applied = chain.settings();
        prop_assert_eq!(applied.reverb, settings.reverb);
        prop_assert_eq!(applied.pitch, settings.pitch);
    }
}
