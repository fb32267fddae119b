//! Platform-specific config and state locations.
//!
//! - **User config**: `~/.config/flowdeck/` (Linux),
//!   `~/Library/Application Support/flowdeck/` (macOS), `%APPDATA%\flowdeck\` (Windows)
//! - **State**: `~/.local/state/flowdeck/` on Linux, the local data directory elsewhere

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "flowdeck";

/// Config file names tried, in order, when none is given explicitly.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["config.json", "config.toml"];

/// File name of the persisted FX parameters.
pub const STATE_FILE_NAME: &str = "fx_state.json";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the directory holding runtime state.
pub fn user_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the persisted FX parameters.
pub fn default_state_file() -> PathBuf {
    user_state_dir().join(STATE_FILE_NAME)
}

/// Locate the config file.
///
/// An explicit path is returned as given if it exists. Otherwise the working
/// directory and then the user config directory are searched for
/// [`CONFIG_FILE_NAMES`].
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.is_file().then(|| path.to_path_buf());
    }

    let search = [PathBuf::from("."), user_config_dir()];
    search
        .iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}
