//! Voice preset listing.

use std::path::PathBuf;

use clap::Args;
use flowdeck_control::{ActivePreset, StateFile};
use flowdeck_io::mapping;

use super::common::{load_config, state_file_path};

#[derive(Args)]
pub struct PresetsArgs {
    /// Config file (JSON or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file to compare against (defaults as for `run`)
    #[arg(long)]
    state_file: Option<PathBuf>,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    let (path, config) = load_config(args.config.as_deref())?;

    if config.voice_presets.is_empty() {
        println!("No voice presets in {}", path.display());
        return Ok(());
    }

    let state_file = StateFile::new(state_file_path(args.state_file.as_deref(), &config));
    let active = match state_file.load() {
        Ok(Some(current)) => ActivePreset::find(&current, &config.voice_presets),
        Ok(None) => ActivePreset::NONE,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable state file");
            ActivePreset::NONE
        }
    };

    println!("Voice Presets ({})", path.display());
    println!("==============\n");
    println!(
        "  {:>3}  {:<20} {:>6} {:>6} {:>6}   {:>9} {:>9}",
        "#", "name", "pitch", "reverb", "echo", "semitones", "echo (s)"
    );

    for (index, preset) in config.voice_presets.iter().enumerate() {
        let values = preset.values;
        let marker = if active.index() == Some(index) { "*" } else { " " };
        let echo = if mapping::echo_mix(values.echo) > 0.0 {
            format!("{:.3}", mapping::echo_delay_seconds(values.echo))
        } else {
            "off".to_string()
        };
        println!(
            "{} {:>3}  {:<20} {:>6.3} {:>6.3} {:>6.3}   {:>+9.1} {:>9}",
            marker,
            index,
            preset.name,
            values.pitch,
            values.reverb,
            values.echo,
            mapping::pitch_semitones(values.pitch),
            echo
        );
    }

    if active.index().is_some() {
        println!("\n* matches the persisted FX state");
    }
    Ok(())
}
