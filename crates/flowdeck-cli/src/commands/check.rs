//! Config validation command.

use std::path::PathBuf;

use clap::Args;
use flowdeck_config::{AppConfig, ConfigError, ValidationError};

use super::common::resolve_config;

#[derive(Args)]
pub struct CheckArgs {
    /// Config file (JSON or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let path = resolve_config(args.config.as_deref())?;

    match AppConfig::load(&path) {
        Ok(config) => {
            println!("{}: OK", path.display());
            println!("  {} voice preset(s)", config.voice_presets.len());
            println!("  {} mixer group(s)", config.audio_mixer_groups.len());
            println!("  {} stream deck button(s)", config.stream_deck_buttons.len());
            Ok(())
        }
        Err(ConfigError::Validation(ValidationError::Multiple(errors))) => {
            println!("{}: {} problem(s)", path.display(), errors.len());
            for error in &errors {
                println!("  - {error}");
            }
            anyhow::bail!("config is invalid")
        }
        Err(e) => {
            println!("{}: {}", path.display(), e);
            anyhow::bail!("config is invalid")
        }
    }
}
