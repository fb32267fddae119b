//! Lowpass-feedback comb filter (Freeverb style).

use crate::{InterpolatedDelay, flush_denormal};

/// Feedback comb with a one-pole damping filter in the loop.
///
/// The output is the sample leaving the delay line; the delay line is fed
/// with `input + damped(output) * feedback`.
#[derive(Debug, Clone)]
pub struct CombFilter {
    delay: InterpolatedDelay,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    /// Create a comb with a loop length of `delay_samples`.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: InterpolatedDelay::new(delay_samples),
            feedback: 0.5,
            damp: 0.5,
            filter_state: 0.0,
        }
    }

    /// Loop gain, clamped to `[0, 0.99]` to stay stable.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// Current loop gain.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// High-frequency damping in `[0, 1]` (0 = bright).
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.delay.read((self.delay.capacity() - 1) as f32);
        self.filter_state =
            flush_denormal(output * (1.0 - self.damp) + self.filter_state * self.damp);
        self.delay.write(input + self.filter_state * self.feedback);
        output
    }

    /// Zero the loop.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.filter_state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_returns_after_loop_length() {
        let mut comb = CombFilter::new(50);
        comb.set_feedback(0.5);
        comb.set_damp(0.0);

        assert_eq!(comb.process(1.0), 0.0);
        for _ in 0..49 {
            assert_eq!(comb.process(0.0), 0.0);
        }
        assert!((comb.process(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_feedback_decays() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(0.7);
        comb.set_damp(0.2);
        comb.process(1.0);
        let mut peak_late = 0.0f32;
        for i in 0..2000 {
            let out = comb.process(0.0);
            if i > 1900 {
                peak_late = peak_late.max(out.abs());
            }
        }
        assert!(peak_late < 1e-3, "tail should decay, got {peak_late}");
    }

    #[test]
    fn test_feedback_clamped() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(1.5);
        assert!(comb.feedback() <= 0.99);
    }
}
