//! Block renderer: picks up the live FX parameters and runs the voice chain.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flowdeck_config::FxParameterSet;
use flowdeck_control::ParameterSource;
use flowdeck_core::{Effect, EffectUnit};
use flowdeck_effects::VoiceChain;

use crate::mapping::chain_settings;

#[derive(Debug, Default)]
struct Counters {
    blocks: AtomicU64,
    stale_blocks: AtomicU64,
    updates: AtomicU64,
}

/// Render counters, readable from any thread while the engine runs.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    counters: Arc<Counters>,
}

impl EngineStats {
    /// Blocks rendered.
    pub fn blocks(&self) -> u64 {
        self.counters.blocks.load(Ordering::Relaxed)
    }

    /// Blocks rendered with the last known-good parameters because the
    /// source had nothing.
    pub fn stale_blocks(&self) -> u64 {
        self.counters.stale_blocks.load(Ordering::Relaxed)
    }

    /// Times new parameters were applied to the chain.
    pub fn updates(&self) -> u64 {
        self.counters.updates.load(Ordering::Relaxed)
    }
}

/// Renders audio blocks through a [`VoiceChain`] driven by a
/// [`ParameterSource`].
///
/// Each block first asks the source for the latest parameters. A new set is
/// mapped and applied to the chain; an unchanged set is not re-applied; no
/// set at all means the previous one stays in force. Nothing here blocks,
/// locks or allocates.
///
/// The engine starts from whatever the source has at construction (or the
/// default set if it has nothing), with the chain settled on those values.
pub struct RenderEngine<S: ParameterSource> {
    source: S,
    chain: VoiceChain,
    current: FxParameterSet,
    stats: EngineStats,
}

impl<S: ParameterSource> RenderEngine<S> {
    /// Create an engine at `sample_rate` reading from `source`.
    pub fn new(sample_rate: f32, source: S) -> Self {
        let current = source.try_snapshot().unwrap_or_default();
        let mut chain = VoiceChain::new(sample_rate);
        chain.update_parameters(&chain_settings(&current));
        chain.reset();

        tracing::info!(
            sample_rate,
            pitch = current.pitch,
            reverb = current.reverb,
            echo = current.echo,
            "render engine created"
        );

        Self {
            source,
            chain,
            current,
            stats: EngineStats::default(),
        }
    }

    /// Handle to this engine's counters.
    pub fn stats(&self) -> EngineStats {
        self.stats.clone()
    }

    /// Parameters currently applied to the chain.
    pub fn current(&self) -> FxParameterSet {
        self.current
    }

    /// The chain being rendered.
    pub fn chain(&self) -> &VoiceChain {
        &self.chain
    }

    /// Latency of the chain at its current settings.
    pub fn latency_samples(&self) -> usize {
        self.chain.latency_samples()
    }

    /// Render one block. `output` must be the same length as `input`.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        self.refresh();
        self.chain.process_block(input, output);
        self.stats.counters.blocks.fetch_add(1, Ordering::Relaxed);
    }

    /// Render one block in place.
    pub fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.refresh();
        self.chain.process_block_inplace(buffer);
        self.stats.counters.blocks.fetch_add(1, Ordering::Relaxed);
    }

    /// Clear all delay lines and tails.
    pub fn reset(&mut self) {
        self.chain.reset();
    }

    fn refresh(&mut self) {
        match self.source.try_snapshot() {
            Some(latest) if latest != self.current => {
                self.chain.update_parameters(&chain_settings(&latest));
                self.current = latest;
                self.stats.counters.updates.fetch_add(1, Ordering::Relaxed);
            }
            Some(_) => {}
            None => {
                self.stats.counters.stale_blocks.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_config::FxParam;
    use flowdeck_control::FxStore;

    #[test]
    fn test_starts_from_source_values() {
        let store = FxStore::new(FxParameterSet::new(0.75, 0.5, 0.2).unwrap());
        let engine = RenderEngine::new(48000.0, store);
        let settings = engine.chain().settings();
        assert_eq!(settings.pitch.semitones, 6.0);
        assert_eq!(settings.reverb.room_size, 0.5);
        assert_eq!(settings.echo.mix, 1.0);
    }

    #[test]
    fn test_applies_only_on_change() {
        let store = FxStore::new(FxParameterSet::default());
        let mut engine = RenderEngine::new(48000.0, store.clone());
        let input = [0.0f32; 256];
        let mut output = [0.0f32; 256];

        engine.process_block(&input, &mut output);
        engine.process_block(&input, &mut output);
        assert_eq!(engine.stats().updates(), 0);

        store.write_partial(FxParam::Pitch, 1.0).unwrap();
        engine.process_block(&input, &mut output);
        engine.process_block(&input, &mut output);
        assert_eq!(engine.stats().updates(), 1);
        assert_eq!(engine.stats().blocks(), 4);
        assert_eq!(engine.chain().settings().pitch.semitones, 12.0);
    }

    #[test]
    fn test_silence_in_silence_out() {
        let store = FxStore::new(FxParameterSet::new(0.3, 0.9, 0.6).unwrap());
        let mut engine = RenderEngine::new(48000.0, store);
        let mut buffer = [0.0f32; 1024];
        engine.process_block_inplace(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }
}
