//! Run the voice engine and serve control requests on stdin.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use crossbeam_channel::{Receiver, select};
use flowdeck_control::{
    CommandQueue, Dispatcher, FxStore, MemorySurface, QueueConfig, SnapshotAssembler, StateFile,
};
use flowdeck_io::{RenderEngine, StopHandle, StreamConfig, VoiceStream};

use super::common::{load_config, state_file_path};
use crate::session::{Reply, Session};

#[derive(Args)]
pub struct RunArgs {
    /// Config file (JSON or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to persist the live FX parameters
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Start from the persisted FX parameters instead of the first preset
    #[arg(long)]
    resume: bool,

    /// Input device name (overrides the config file)
    #[arg(long)]
    input_device: Option<String>,

    /// Output device name (overrides the config file)
    #[arg(long)]
    output_device: Option<String>,

    /// Commands buffered before new ones are dropped
    #[arg(long, default_value = "64")]
    queue_capacity: usize,

    /// Command worker threads; more than one may apply commands out of order
    #[arg(long, default_value = "1")]
    workers: usize,

    /// Control only; do not open audio devices
    #[arg(long)]
    no_audio: bool,

    /// Print a state line whenever the FX parameters change
    #[arg(long)]
    watch: bool,
}

enum Flow {
    Continue,
    AudioClosed,
    Stop,
}

enum AudioEvent {
    Started(StopHandle),
    Finished(flowdeck_io::Result<()>),
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let (config_path, config) = load_config(args.config.as_deref())?;
    let config = Arc::new(config);
    tracing::info!(
        path = %config_path.display(),
        presets = config.voice_presets.len(),
        groups = config.audio_mixer_groups.len(),
        "config loaded"
    );

    let state_file = StateFile::new(state_file_path(args.state_file.as_deref(), &config));
    let initial = if args.resume {
        match state_file.load() {
            Ok(Some(set)) => set,
            Ok(None) => config.initial_fx(),
            Err(e) => {
                tracing::warn!(error = %e, "cannot resume fx state; using first preset");
                config.initial_fx()
            }
        }
    } else {
        config.initial_fx()
    };
    tracing::info!(path = %state_file.path().display(), "persisting fx state");
    let store = FxStore::with_state_file(initial, state_file);

    // No OS mixer binding: volume and mute state live in process.
    let surface = Arc::new(MemorySurface::new());

    let dispatcher = Arc::new(Dispatcher::new(
        store.clone(),
        surface.clone(),
        Arc::clone(&config),
    ));
    let queue = CommandQueue::start(
        dispatcher,
        QueueConfig {
            capacity: args.queue_capacity,
            workers: args.workers,
        },
    )?;
    let assembler = SnapshotAssembler::new(store.clone(), surface, Arc::clone(&config));
    let session = Session::new(queue, assembler, Arc::clone(&config));

    let (audio_tx, mut audio_rx) = crossbeam_channel::bounded::<AudioEvent>(2);
    let mut engine_stats = None;
    if args.no_audio {
        tracing::info!("audio disabled");
    } else {
        let stream_config = StreamConfig {
            input_device: args
                .input_device
                .or_else(|| config.audio_devices.input_device_name.clone()),
            output_device: args
                .output_device
                .or_else(|| config.audio_devices.output_device_name.clone()),
            ..StreamConfig::default()
        };
        let engine = RenderEngine::new(stream_config.sample_rate as f32, store.clone());
        engine_stats = Some(engine.stats());

        std::thread::Builder::new()
            .name("flowdeck-audio".to_string())
            .spawn(move || {
                let result = VoiceStream::open(&stream_config).and_then(|mut stream| {
                    let _ = audio_tx.send(AudioEvent::Started(stream.stop_handle()));
                    stream.run(engine)
                });
                let _ = audio_tx.send(AudioEvent::Finished(result));
            })?;
    }

    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })?;

    let lines = spawn_stdin_reader()?;
    let changes = if args.watch {
        store.subscribe()
    } else {
        crossbeam_channel::never()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut stop_handle = None;
    let mut audio_failure = None;

    loop {
        let flow = select! {
            recv(lines) -> line => match line {
                Ok(line) => match session.handle_line(&line) {
                    Reply::Silent => Flow::Continue,
                    Reply::Line(reply) => {
                        writeln!(out, "{reply}")?;
                        out.flush()?;
                        Flow::Continue
                    }
                    Reply::Quit => Flow::Stop,
                },
                Err(_) => {
                    tracing::info!("stdin closed");
                    Flow::Stop
                }
            },
            recv(changes) -> _ => {
                writeln!(out, "{}", session.state_json())?;
                out.flush()?;
                Flow::Continue
            }
            recv(audio_rx) -> event => match event {
                Ok(AudioEvent::Started(handle)) => {
                    stop_handle = Some(handle);
                    Flow::Continue
                }
                Ok(AudioEvent::Finished(Ok(()))) => Flow::Continue,
                Ok(AudioEvent::Finished(Err(e))) => {
                    tracing::error!(error = %e, "audio failed; shutting down");
                    audio_failure = Some(e);
                    Flow::Stop
                }
                Err(_) => Flow::AudioClosed,
            },
            recv(shutdown_rx) -> _ => {
                tracing::info!("interrupted");
                Flow::Stop
            }
        };

        match flow {
            Flow::Continue => {}
            Flow::AudioClosed => audio_rx = crossbeam_channel::never(),
            Flow::Stop => break,
        }
    }

    if let Some(handle) = stop_handle {
        handle.stop();
    }
    let dropped = session.dropped();
    session.finish();

    if let Some(stats) = engine_stats {
        tracing::info!(
            blocks = stats.blocks(),
            stale_blocks = stats.stale_blocks(),
            updates = stats.updates(),
            "render engine stopped"
        );
    }
    tracing::info!(dropped_commands = dropped, "flowdeck stopped");

    match audio_failure {
        Some(e) => Err(anyhow::anyhow!("audio stream failed: {e}")),
        None => Ok(()),
    }
}

/// Forward stdin lines to a channel; the channel closes at EOF.
fn spawn_stdin_reader() -> std::io::Result<Receiver<String>> {
    let (tx, rx) = crossbeam_channel::bounded::<String>(64);
    std::thread::Builder::new()
        .name("flowdeck-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}
