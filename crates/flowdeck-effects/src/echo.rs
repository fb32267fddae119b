//! Single-tap echo.
//!
//! The voice chain uses it as a slap-back: feedback stays at zero and the
//! mix is either fully dry or fully wet.

use flowdeck_core::{
    Effect, EffectUnit, InterpolatedDelay, SmoothedParam, flush_denormal, wet_dry_mix,
};

/// Longest delay the echo buffer is sized for.
pub const DEFAULT_MAX_DELAY_SECONDS: f32 = 0.5;

/// Echo parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoSettings {
    /// Delay time in seconds. Clamped to the buffer length.
    pub delay_seconds: f32,
    /// Proportion of the delayed signal fed back, `[0, 0.95]`.
    pub feedback: f32,
    /// Wet proportion in `[0, 1]`.
    pub mix: f32,
}

impl Default for EchoSettings {
    fn default() -> Self {
        Self {
            delay_seconds: 0.0,
            feedback: 0.0,
            mix: 0.0,
        }
    }
}

/// Delay-line echo with smoothed time and mix.
///
/// A delay of zero samples passes the input straight through the wet path.
#[derive(Debug, Clone)]
pub struct Echo {
    line: InterpolatedDelay,
    delay_samples: SmoothedParam,
    mix: SmoothedParam,
    feedback: f32,
    max_delay_seconds: f32,
    sample_rate: f32,
}

impl Echo {
    /// Create an echo sized for [`DEFAULT_MAX_DELAY_SECONDS`].
    pub fn new(sample_rate: f32) -> Self {
        Self::with_max_delay(sample_rate, DEFAULT_MAX_DELAY_SECONDS)
    }

    /// Create an echo with room for `max_delay_seconds` of history.
    pub fn with_max_delay(sample_rate: f32, max_delay_seconds: f32) -> Self {
        Self {
            line: InterpolatedDelay::from_time(sample_rate, max_delay_seconds),
            delay_samples: SmoothedParam::with_config(0.0, sample_rate, 50.0),
            mix: SmoothedParam::with_config(0.0, sample_rate, 5.0),
            feedback: 0.0,
            max_delay_seconds,
            sample_rate,
        }
    }

    /// Wet proportion currently being smoothed towards.
    pub fn mix(&self) -> f32 {
        self.mix.target()
    }

    /// Target delay in seconds.
    pub fn delay_seconds(&self) -> f32 {
        self.delay_samples.target() / self.sample_rate
    }

    fn max_delay_samples(&self) -> f32 {
        (self.line.capacity() - 2) as f32
    }
}

impl Effect for Echo {
    fn process(&mut self, input: f32) -> f32 {
        let delay = self.delay_samples.advance();
        let mix = self.mix.advance();

        // The line is read before this sample is written, so a delay of N
        // samples is N - 1 behind the newest entry.
        let delayed = if delay < 1.0 {
            input
        } else {
            self.line.read(delay - 1.0)
        };
        self.line.write(flush_denormal(input + delayed * self.feedback));

        wet_dry_mix(input, delayed, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let seconds = self.delay_seconds();
        self.sample_rate = sample_rate;
        self.line = InterpolatedDelay::from_time(sample_rate, self.max_delay_seconds);
        self.delay_samples.set_sample_rate(sample_rate);
        self.delay_samples.set_immediate(seconds * sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.line.clear();
        self.delay_samples.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl EffectUnit for Echo {
    type Settings = EchoSettings;

    fn update_parameters(&mut self, settings: &EchoSettings) {
        let samples =
            (settings.delay_seconds * self.sample_rate).clamp(0.0, self.max_delay_samples());
        self.delay_samples.set_target(samples);
        self.feedback = settings.feedback.clamp(0.0, 0.95);
        self.mix.set_target(settings.mix.clamp(0.0, 1.0));
    }

    fn settings(&self) -> EchoSettings {
        EchoSettings {
            delay_seconds: self.delay_seconds(),
            feedback: self.feedback,
            mix: self.mix.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(settings: EchoSettings) -> Echo {
        let mut echo = Echo::new(48000.0);
        echo.update_parameters(&settings);
        echo.reset();
        echo
    }

    #[test]
    fn test_zero_mix_is_transparent() {
        let mut echo = settled(EchoSettings {
            delay_seconds: 0.25,
            feedback: 0.0,
            mix: 0.0,
        });
        for i in 0..2000 {
            let x = (i as f32 * 0.01).sin();
            assert_eq!(echo.process(x), x);
        }
    }

    #[test]
    fn test_impulse_arrives_after_delay() {
        let mut echo = settled(EchoSettings {
            delay_seconds: 0.1,
            feedback: 0.0,
            mix: 1.0,
        });

        assert_eq!(echo.process(1.0), 0.0);
        for i in 1..4800 {
            assert_eq!(echo.process(0.0), 0.0, "early output at {i}");
        }
        assert!((echo.process(0.0) - 1.0).abs() < 1e-6);
        assert_eq!(echo.process(0.0), 0.0);
    }

    #[test]
    fn test_zero_delay_full_wet_passes_input() {
        let mut echo = settled(EchoSettings {
            delay_seconds: 0.0,
            feedback: 0.0,
            mix: 1.0,
        });
        assert_eq!(echo.process(0.3), 0.3);
    }

    #[test]
    fn test_feedback_repeats() {
        let mut echo = settled(EchoSettings {
            delay_seconds: 0.01,
            feedback: 0.5,
            mix: 1.0,
        });
        echo.process(1.0);
        let mut repeats = Vec::new();
        for _ in 0..1500 {
            let out = echo.process(0.0);
            if out.abs() > 1e-3 {
                repeats.push(out);
            }
        }
        assert!(repeats.len() >= 3, "got {repeats:?}");
        assert!(repeats[1] < repeats[0]);
    }

    #[test]
    fn test_delay_clamped_to_buffer() {
        let mut echo = Echo::new(48000.0);
        echo.update_parameters(&EchoSettings {
            delay_seconds: 10.0,
            feedback: 0.0,
            mix: 1.0,
        });
        assert!(echo.delay_seconds() <= DEFAULT_MAX_DELAY_SECONDS);
    }

    #[test]
    fn test_mix_reports_target() {
        let mut echo = Echo::new(48000.0);
        echo.update_parameters(&EchoSettings {
            delay_seconds: 0.2,
            feedback: 0.0,
            mix: 1.0,
        });
        assert_eq!(echo.mix(), 1.0);
        assert_eq!(echo.settings().mix, 1.0);
    }
}
