//! Circular delay line with fractional reads.
//!
//! Used by the echo unit (up to half a second), the reverb combs and
//! allpasses, and the pitch shifter's two rotating read taps.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Heap-allocated circular delay line.
///
/// The buffer is allocated once in [`new`](Self::new) and never grows, so
/// reads and writes are safe on the audio thread.
///
/// `read(d)` returns the sample written `d` writes ago, where `d = 0` is the
/// most recent write.
///
/// ```rust
/// use flowdeck_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(8);
/// delay.write(1.0);
/// delay.write(2.0);
/// assert_eq!(delay.read(0.0), 2.0);
/// assert_eq!(delay.read(1.0), 1.0);
/// assert_eq!(delay.read(0.5), 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Create a delay line holding `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Delay size must be > 0");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Create a delay line long enough for `max_seconds` at `sample_rate`.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 2)
    }

    /// Read `delay_samples` behind the most recent write.
    ///
    /// Fractional delays interpolate linearly between neighbours. Delays
    /// beyond the capacity are clamped to the oldest sample.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let max_delay = (len - 1) as f32;
        let delay = delay_samples.clamp(0.0, max_delay);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        // Most recent write sits one slot behind write_pos.
        let newer = (self.write_pos + len - 1 - whole) % len;

        if frac == 0.0 || whole + 1 >= len {
            return self.buffer[newer];
        }
        let older = (newer + len - 1) % len;
        let a = self.buffer[newer];
        a + (self.buffer[older] - a) * frac
    }

    /// Append a sample, overwriting the oldest one.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Zero the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Buffer length in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
