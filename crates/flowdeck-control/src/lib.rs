//! Control plane for the flowdeck voice engine.
//!
//! - [`FxStore`] - the live FX parameters: atomic reads, serialized writes,
//!   optional JSON persistence and change subscriptions
//! - [`ControlCommand`] / [`Dispatcher`] - the command vocabulary and its
//!   validation and dispatch
//! - [`CommandQueue`] - bounded worker pool that never blocks the caller
//! - [`match_preset`] / [`ActivePreset`] - which preset the live values equal
//! - [`SnapshotAssembler`] - point-in-time state for the control surface
//! - [`AudioSurface`] - the host's mixer, media keys and launcher
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use flowdeck_config::AppConfig;
//! use flowdeck_control::{Dispatcher, FxStore, MemorySurface, SnapshotAssembler};
//!
//! let config = Arc::new(AppConfig::default());
//! let store = FxStore::new(config.initial_fx());
//! let surface = Arc::new(MemorySurface::new());
//!
//! let dispatcher = Dispatcher::new(store.clone(), surface.clone(), config.clone());
//! assert!(dispatcher.dispatch_str(r#"{"action": "set_voice_fx", "fx_name": "echo", "value": 0.5}"#));
//!
//! let snapshot = SnapshotAssembler::new(store, surface, config).assemble();
//! assert_eq!(snapshot.voice.fx.echo, 0.5);
//! ```

mod command;
mod dispatcher;
mod matcher;
mod queue;
mod snapshot;
mod store;
mod surface;

pub use command::{Acknowledgement, CommandError, ControlCommand};
pub use dispatcher::{Dispatcher, Outcome, Rejection};
pub use matcher::{ActivePreset, match_preset};
pub use queue::{CommandQueue, QueueConfig, Submission};
pub use snapshot::{AudioState, Snapshot, SnapshotAssembler, VoiceState};
pub use store::{FxStore, ParameterSource, StateFile, StoreError};
pub use surface::{AudioSurface, ChannelState, MemorySurface, SurfaceError};
