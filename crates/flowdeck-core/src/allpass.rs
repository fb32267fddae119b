//! Schroeder allpass for reverb diffusion.

use crate::{InterpolatedDelay, flush_denormal};

/// Freeverb-style allpass: `out = delayed - input`,
/// `delay_in = input + delayed * feedback`.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: InterpolatedDelay,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with a loop length of `delay_samples`.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: InterpolatedDelay::new(delay_samples),
            feedback: 0.5,
        }
    }

    /// Feedback coefficient, clamped to `(-1, 1)`.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read((self.delay.capacity() - 1) as f32);
        self.delay
            .write(flush_denormal(input + delayed * self.feedback));
        delayed - input
    }

    /// Zero the loop.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_finite_and_bounded() {
        let mut ap = AllpassFilter::new(100);
        for i in 0..1000 {
            let x = if i % 37 == 0 { 1.0 } else { 0.0 };
            let out = ap.process(x);
            assert!(out.is_finite());
            assert!(out.abs() < 4.0);
        }
    }

    #[test]
    fn test_first_output_is_inverted_input() {
        let mut ap = AllpassFilter::new(20);
        assert_eq!(ap.process(0.5), -0.5);
    }
}
