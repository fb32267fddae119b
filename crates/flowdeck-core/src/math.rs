//! Small DSP math helpers.

use libm::exp2f;

/// Replace denormal-range values with zero.
///
/// Feedback paths (combs, allpasses, echo) decay towards zero forever; once
/// the signal drops into the subnormal range some CPUs slow down by orders
/// of magnitude.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Convert a semitone offset to a playback-rate ratio.
///
/// ```rust
/// use flowdeck_core::semitones_to_ratio;
///
/// assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-6);
/// assert!((semitones_to_ratio(-12.0) - 0.5).abs() < 1e-6);
/// assert_eq!(semitones_to_ratio(0.0), 1.0);
/// ```
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    exp2f(semitones / 12.0)
}

/// Linear wet/dry crossfade. `mix` is the wet proportion.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}
