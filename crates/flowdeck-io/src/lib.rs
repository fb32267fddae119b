//! Audio side of the flowdeck voice engine.
//!
//! - [`mapping`] - FX parameters to voice chain settings
//! - [`RenderEngine`] - per-block parameter pickup and rendering
//! - [`VoiceStream`] - mono duplex cpal stream driving a [`RenderEngine`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowdeck_config::FxParameterSet;
//! use flowdeck_control::FxStore;
//! use flowdeck_io::{RenderEngine, StreamConfig, VoiceStream};
//!
//! let store = FxStore::new(FxParameterSet::default());
//! let config = StreamConfig::default();
//! let engine = RenderEngine::new(config.sample_rate as f32, store.clone());
//!
//! let mut stream = VoiceStream::open(&config)?;
//! stream.run(engine)?; // blocks until stopped or the device fails
//! ```

mod engine;
pub mod mapping;
mod stream;

pub use engine::{EngineStats, RenderEngine};
pub use mapping::chain_settings;
pub use stream::{
    AudioDevice, StopHandle, StreamConfig, VoiceStream, default_device, list_devices,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
