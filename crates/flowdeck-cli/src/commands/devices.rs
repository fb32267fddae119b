//! Audio device listing.

use clap::Args;
use flowdeck_config::AudioDevices;
use flowdeck_io::{default_device, list_devices};

#[derive(Args)]
pub struct DevicesArgs {
    /// Only print the `audio_devices` config fragment
    #[arg(long)]
    json: bool,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    let (default_input, default_output) = default_device();
    let fragment = serde_json::json!({
        "audio_devices": AudioDevices {
            input_device_name: default_input.clone(),
            output_device_name: default_output.clone(),
        }
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fragment)?);
        return Ok(());
    }

    let devices = list_devices()?;
    if devices.is_empty() {
        println!("No audio devices found.");
        return Ok(());
    }

    println!("Available Audio Devices");
    println!("=======================\n");

    let inputs: Vec<_> = devices.iter().filter(|d| d.is_input).collect();
    if !inputs.is_empty() {
        println!("Input Devices:");
        for device in &inputs {
            let marker = if default_input.as_ref() == Some(&device.name) {
                " (default)"
            } else {
                ""
            };
            println!(
                "  {} ({} Hz){}",
                device.name, device.default_sample_rate, marker
            );
        }
        println!();
    }

    let outputs: Vec<_> = devices.iter().filter(|d| d.is_output).collect();
    if !outputs.is_empty() {
        println!("Output Devices:");
        for device in &outputs {
            let marker = if default_output.as_ref() == Some(&device.name) {
                " (default)"
            } else {
                ""
            };
            println!(
                "  {} ({} Hz){}",
                device.name, device.default_sample_rate, marker
            );
        }
        println!();
    }

    println!(
        "Total: {} input(s), {} output(s)",
        inputs.len(),
        outputs.len()
    );
    println!();
    println!("Paste into your config to pin the current defaults:");
    println!("{}", serde_json::to_string_pretty(&fragment)?);
    println!();
    println!("Names match case-insensitively on any substring, e.g.:");
    println!("  flowdeck run --input-device \"USB\" --output-device \"CABLE Input\"");

    Ok(())
}
