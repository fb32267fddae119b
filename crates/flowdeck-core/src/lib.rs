//! FlowDeck Core - DSP primitives for the voice effect chain
//!
//! The building blocks shared by every effect unit in `flowdeck-effects`.
//! Everything here is allocation-free once constructed, so it can run inside
//! the real-time audio callback.
//!
//! # Contents
//!
//! - [`Effect`] - per-sample / per-block processing contract
//! - [`EffectUnit`] - an [`Effect`] that is reconfigured from a typed settings value
//! - [`SmoothedParam`] - one-pole parameter smoothing for click-free changes
//! - [`InterpolatedDelay`] - circular delay line with fractional reads
//! - [`CombFilter`] / [`AllpassFilter`] - Freeverb building blocks
//! - Math helpers: [`flush_denormal`], [`semitones_to_ratio`], [`wet_dry_mix`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets:
//!
//! ```toml
//! [dependencies]
//! flowdeck-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod math;
pub mod param;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use delay::InterpolatedDelay;
pub use effect::{Effect, EffectUnit};
pub use math::{flush_denormal, semitones_to_ratio, wet_dry_mix};
pub use param::SmoothedParam;
