//! Configuration types for the flowdeck voice engine.
//!
//! - [`FxParam`] / [`FxParameterSet`] - the three live FX values and their
//!   `[0, 1]` range rules
//! - [`Preset`] - a named parameter set
//! - [`AppConfig`] - the config file (presets, mixer groups, audio devices,
//!   stream deck buttons), loaded from JSON or TOML
//! - [`validation`] - value checks run on every load
//! - [`paths`] - platform config and state directories
//!
//! # Example
//!
//! ```rust,no_run
//! use flowdeck_config::{AppConfig, paths};
//!
//! let path = paths::find_config(None).expect("no config file found");
//! let config = AppConfig::load(&path).unwrap();
//! println!("{} presets", config.voice_presets.len());
//! ```

mod app_config;
mod error;
mod fx;
mod preset;

/// Platform-specific config and state paths.
pub mod paths;

/// Config validation.
pub mod validation;

pub use app_config::{AppConfig, AudioDevices, ConfigFormat, MixerGroup, StreamDeckButton};
pub use error::ConfigError;
pub use fx::{FxParam, FxParameterSet, FxValueError, UnknownFxParam, check_value};
pub use preset::Preset;
pub use validation::{ValidationError, ValidationResult, validate_config};
