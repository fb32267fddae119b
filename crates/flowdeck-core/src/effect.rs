//! Effect traits.
//!
//! [`Effect`] is the processing contract every unit in the voice chain
//! implements. [`EffectUnit`] adds the reconfiguration half: a unit receives a
//! complete typed settings value, never individual loose parameters, so the
//! chain can push one mapped parameter set per audio block.
//!
//! Each implementor exclusively owns its DSP state (delay buffers, filter
//! memory). Nothing is shared between units.

/// Processing contract for a mono audio effect.
///
/// All methods must be real-time safe: no allocation, no locking, no I/O.
pub trait Effect {
    /// Process a single sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls [`process`](Self::process) per sample.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate and recompute rate-dependent state.
    ///
    /// May reallocate internal buffers; never call from the audio callback.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (delay lines, filter history) without touching
    /// the configured settings.
    fn reset(&mut self);

    /// Processing latency in samples. Most units have none.
    fn latency_samples(&self) -> usize {
        0
    }
}

/// An [`Effect`] driven by a typed settings value.
///
/// The render engine maps the shared FX parameters to one `Settings` value
/// per unit and hands it over with [`update_parameters`](Self::update_parameters)
/// before processing the block. Implementations smooth internally, so calling
/// this once per block with a changed value does not click.
pub trait EffectUnit: Effect {
    /// The complete configuration of this unit.
    type Settings: Copy + PartialEq;

    /// Apply new settings. Must be real-time safe.
    fn update_parameters(&mut self, settings: &Self::Settings);

    /// The settings most recently applied.
    fn settings(&self) -> Self::Settings;
}
