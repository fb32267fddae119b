//! Real-time voice streaming via cpal.
//!
//! The microphone feeds a bounded sample channel that the output callback
//! drains into the [`RenderEngine`]. The channel is pre-filled with one
//! block of silence so the output side never starts starved.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host};
use crossbeam_channel::{Receiver, Sender};
use flowdeck_control::ParameterSource;

use crate::engine::RenderEngine;
use crate::{Error, Result};

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether the device supports audio input.
    pub is_input: bool,
    /// Whether the device supports audio output.
    pub is_output: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

/// Stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Buffer size in frames.
    pub buffer_size: u32,
    /// Input device name or substring (uses default if `None`).
    pub input_device: Option<String>,
    /// Output device name or substring (uses default if `None`).
    pub output_device: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 1024,
            input_device: None,
            output_device: None,
        }
    }
}

impl StreamConfig {
    /// Duration of one buffer in milliseconds.
    pub fn buffer_ms(&self) -> f32 {
        self.buffer_size as f32 * 1000.0 / self.sample_rate as f32
    }
}

/// List all available audio devices.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(inputs) = host.input_devices() {
        for device in inputs {
            if let Ok(name) = device_name(&device) {
                let sample_rate = device
                    .default_input_config()
                    .map(|c| c.sample_rate())
                    .unwrap_or(48000);
                let is_output = device.default_output_config().is_ok();

                devices.push(AudioDevice {
                    name,
                    is_input: true,
                    is_output,
                    default_sample_rate: sample_rate,
                });
            }
        }
    }

    // Output-only devices
    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device) {
                if devices.iter().any(|d| d.name == name) {
                    continue;
                }

                let sample_rate = device
                    .default_output_config()
                    .map(|c| c.sample_rate())
                    .unwrap_or(48000);

                devices.push(AudioDevice {
                    name,
                    is_input: false,
                    is_output: true,
                    default_sample_rate: sample_rate,
                });
            }
        }
    }

    Ok(devices)
}

/// Default input and output device names, if the host has them.
pub fn default_device() -> (Option<String>, Option<String>) {
    let host = cpal::default_host();
    let input = host
        .default_input_device()
        .and_then(|d| device_name(&d).ok());
    let output = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());
    (input, output)
}

/// First device whose name contains `search`, case-insensitively.
fn find_device<I>(devices: I, search: &str, kind: &str) -> Result<Device>
where
    I: Iterator<Item = Device>,
{
    let search_lower = search.to_lowercase();
    for device in devices {
        if let Ok(name) = device_name(&device)
            && name.to_lowercase().contains(&search_lower)
        {
            tracing::debug!(kind, search, device = %name, "matched audio device");
            return Ok(device);
        }
    }
    Err(Error::DeviceNotFound(format!(
        "no {} device matching '{}'",
        kind, search
    )))
}

fn find_input_device(host: &Host, name: Option<&str>) -> Result<Device> {
    match name {
        Some(search) => find_device(
            host.input_devices()
                .map_err(|e| Error::Stream(e.to_string()))?,
            search,
            "input",
        ),
        None => host.default_input_device().ok_or(Error::NoDevice),
    }
}

fn find_output_device(host: &Host, name: Option<&str>) -> Result<Device> {
    match name {
        Some(search) => find_device(
            host.output_devices()
                .map_err(|e| Error::Stream(e.to_string()))?,
            search,
            "output",
        ),
        None => host.default_output_device().ok_or(Error::NoDevice),
    }
}

/// Stops a running [`VoiceStream`] from another thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Sender<()>,
}

impl StopHandle {
    /// Ask the stream to stop. [`VoiceStream::run`] then returns `Ok`.
    pub fn stop(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Mono duplex stream: microphone in, rendered voice out.
pub struct VoiceStream {
    input_device: Device,
    output_device: Device,
    config: StreamConfig,
    stop_tx: Sender<()>,
    stop_rx: Receiver<()>,
}

impl VoiceStream {
    /// Open the configured (or default) input and output devices.
    pub fn open(config: &StreamConfig) -> Result<Self> {
        let host = cpal::default_host();
        let input_device = find_input_device(&host, config.input_device.as_deref())?;
        let output_device = find_output_device(&host, config.output_device.as_deref())?;

        tracing::info!(
            host = host.id().name(),
            input = %device_name(&input_device).unwrap_or_default(),
            output = %device_name(&output_device).unwrap_or_default(),
            "audio devices opened"
        );

        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        Ok(Self {
            input_device,
            output_device,
            config: config.clone(),
            stop_tx,
            stop_rx,
        })
    }

    /// Get the configured sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Handle that makes [`run`](Self::run) return.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: self.stop_tx.clone(),
        }
    }

    /// Render the microphone through `engine` until stopped.
    ///
    /// Blocks. Returns `Ok(())` after [`StopHandle::stop`], and
    /// `Err(Error::Stream)` if either stream fails to build or start, or
    /// reports an error while running.
    pub fn run<S>(&mut self, mut engine: RenderEngine<S>) -> Result<()>
    where
        S: ParameterSource + 'static,
    {
        let block = self.config.buffer_size.max(1) as usize;
        let stream_config = cpal::StreamConfig {
            channels: 1,
            sample_rate: self.config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(self.config.buffer_size),
        };

        let (sample_tx, sample_rx) = crossbeam_channel::bounded::<f32>(block * 4);
        for _ in 0..block {
            let _ = sample_tx.try_send(0.0);
        }

        let (fatal_tx, fatal_rx) = crossbeam_channel::bounded::<String>(4);

        let input_fatal = fatal_tx.clone();
        let input_stream = self
            .input_device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    for &sample in data {
                        let _ = sample_tx.try_send(sample);
                    }
                },
                move |err| {
                    let _ = input_fatal.try_send(format!("input: {err}"));
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        let mut scratch = vec![0.0f32; block];
        let output_stream = self
            .output_device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for chunk in data.chunks_mut(scratch.len()) {
                        let buf = &mut scratch[..chunk.len()];
                        for sample in buf.iter_mut() {
                            *sample = sample_rx.try_recv().unwrap_or(0.0);
                        }
                        engine.process_block(buf, chunk);
                    }
                },
                move |err| {
                    let _ = fatal_tx.try_send(format!("output: {err}"));
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        input_stream
            .play()
            .map_err(|e| Error::Stream(e.to_string()))?;
        output_stream
            .play()
            .map_err(|e| Error::Stream(e.to_string()))?;

        tracing::info!(
            sample_rate = self.config.sample_rate,
            buffer_size = self.config.buffer_size,
            buffer_ms = self.config.buffer_ms(),
            "voice stream running"
        );

        crossbeam_channel::select! {
            recv(self.stop_rx) -> _ => {
                tracing::info!("voice stream stopped");
                Ok(())
            }
            recv(fatal_rx) -> msg => {
                let msg = msg.unwrap_or_else(|_| "stream closed".to_string());
                tracing::error!(error = %msg, "voice stream failed");
                Err(Error::Stream(msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.buffer_size, 1024);
        assert!((config.buffer_ms() - 21.333).abs() < 0.01);
    }

    #[test]
    fn test_list_devices() {
        // Device availability depends on the system; this only checks the
        // call itself succeeds.
        assert!(list_devices().is_ok());
    }

    #[test]
    fn test_stop_handle_is_idempotent() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let handle = StopHandle { tx };
        handle.stop();
        handle.stop();
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
