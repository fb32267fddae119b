//! FlowDeck Effects - the voice effect units
//!
//! Three units, each exclusively owning its DSP state, and the chain that
//! runs them in a fixed order:
//!
//! - [`Reverb`] - Freeverb-style room reverb, driven by room size
//! - [`Echo`] - single-tap delay with wet/dry mix
//! - [`PitchShifter`] - two-tap rotating-delay pitch shifter (±semitones)
//! - [`VoiceChain`] - reverb → echo → pitch shift
//!
//! ## Example
//!
//! ```rust
//! use flowdeck_core::{Effect, EffectUnit};
//! use flowdeck_effects::{VoiceChain, VoiceChainSettings};
//!
//! let mut chain = VoiceChain::new(48000.0);
//! let mut settings = VoiceChainSettings::default();
//! settings.pitch.semitones = -4.0;
//! chain.update_parameters(&settings);
//!
//! let input = vec![0.0f32; 1024];
//! let mut output = vec![0.0f32; 1024];
//! chain.process_block(&input, &mut output);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chain;
pub mod echo;
pub mod pitch_shift;
pub mod reverb;

pub use chain::{VoiceChain, VoiceChainSettings};
pub use echo::{Echo, EchoSettings};
pub use pitch_shift::{PitchSettings, PitchShifter};
pub use reverb::{Reverb, ReverbSettings};
