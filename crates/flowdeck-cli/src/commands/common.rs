//! Shared CLI helpers used across multiple commands.

use std::path::{Path, PathBuf};

use flowdeck_config::{AppConfig, paths};

/// Locate the config file: `explicit` if given, else the working directory,
/// else the user config directory.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = paths::find_config(explicit) {
        return Ok(path);
    }
    match explicit {
        Some(path) => anyhow::bail!("Config file '{}' not found", path.display()),
        None => anyhow::bail!(
            "No config file found. Looked for {} in the working directory and {}",
            paths::CONFIG_FILE_NAMES.join(" / "),
            paths::user_config_dir().display()
        ),
    }
}

/// Locate, load and validate the config file.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<(PathBuf, AppConfig)> {
    let path = resolve_config(explicit)?;
    let config = AppConfig::load(&path)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    Ok((path, config))
}

/// State file to persist FX parameters to: the flag, then the config's
/// `state_file`, then the platform default.
pub fn state_file_path(flag: Option<&Path>, config: &AppConfig) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.state_file.clone())
        .unwrap_or_else(paths::default_state_file)
}
