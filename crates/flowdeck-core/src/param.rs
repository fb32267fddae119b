//! Parameter smoothing.
//!
//! Settings arrive once per 1024-sample block. Applying them as steps would
//! produce zipper noise, so units smooth each continuous value with a
//! one-pole lowpass towards the latest target.
//!
//! ```rust
//! use flowdeck_core::SmoothedParam;
//!
//! let mut room = SmoothedParam::with_config(0.1, 48000.0, 20.0);
//! room.set_target(0.8);
//! for _ in 0..4800 {
//!     room.advance();
//! }
//! assert!((room.get() - 0.8).abs() < 0.01);
//! ```

use libm::expf;

/// One-pole smoothed parameter.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create an unsmoothed parameter (changes apply instantly until a
    /// smoothing time is configured).
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create a parameter with a sample rate and time constant.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Set the value to smooth towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value`.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Change the sample rate, keeping the time constant.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Value being smoothed towards.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the smoothed value is within 1e-6 of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Finish the ramp immediately.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    // coeff = 1 - exp(-1 / (tau * fs)); tau reaches 63% of a step.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_is_instant() {
        let mut p = SmoothedParam::new(0.0);
        p.set_target(1.0);
        assert_eq!(p.advance(), 1.0);
        assert!(p.is_settled());
    }

    #[test]
    fn test_smoothing_is_gradual() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        let first = p.advance();
        assert!(first > 0.0 && first < 0.01, "got {first}");
        for _ in 0..48000 {
            p.advance();
        }
        assert!(p.is_settled());
    }

    #[test]
    fn test_time_constant() {
        // After one time constant the value reaches ~63% of the step.
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        for _ in 0..480 {
            p.advance();
        }
        assert!((p.get() - 0.632).abs() < 0.01, "got {}", p.get());
    }

    #[test]
    fn test_set_immediate_and_snap() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 50.0);
        p.set_immediate(0.7);
        assert_eq!(p.get(), 0.7);
        p.set_target(0.2);
        p.snap_to_target();
        assert_eq!(p.get(), 0.2);
        assert_eq!(p.target(), 0.2);
    }
}
