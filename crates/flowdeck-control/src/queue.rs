//! Bounded command queue.
//!
//! Requests are handed to a fixed pool of worker threads through a bounded
//! channel. When the channel is full the newest command is dropped and the
//! caller is told so; submission never blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Sender, TrySendError};

use crate::command::ControlCommand;
use crate::dispatcher::Dispatcher;

/// Queue sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Commands buffered before new ones are dropped.
    pub capacity: usize,
    /// Worker threads draining the queue. With one worker commands apply
    /// in submission order.
    pub workers: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            workers: 1,
        }
    }
}

/// What happened to a submitted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Queued for a worker.
    Accepted,
    /// Not queued: the queue was full or shut down.
    Dropped,
}

/// Fixed worker pool fed by a bounded channel.
///
/// Workers exit once the queue is closed and drained. [`shutdown`](Self::shutdown)
/// (or dropping the queue) closes it and joins them.
pub struct CommandQueue {
    tx: Option<Sender<ControlCommand>>,
    workers: Vec<JoinHandle<()>>,
    dropped: Arc<AtomicU64>,
}

impl CommandQueue {
    /// Start `config.workers` threads (at least one) dispatching through
    /// `dispatcher`.
    pub fn start(dispatcher: Arc<Dispatcher>, config: QueueConfig) -> std::io::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded::<ControlCommand>(config.capacity.max(1));
        let worker_count = config.workers.max(1);

        let mut workers = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            let rx = rx.clone();
            let dispatcher = Arc::clone(&dispatcher);
            let handle = std::thread::Builder::new()
                .name(format!("flowdeck-cmd-{id}"))
                .spawn(move || {
                    for command in rx {
                        dispatcher.dispatch(&command);
                    }
                    tracing::debug!(worker = id, "command worker exiting");
                })?;
            workers.push(handle);
        }

        tracing::info!(
            capacity = config.capacity.max(1),
            workers = worker_count,
            "command queue started"
        );

        Ok(Self {
            tx: Some(tx),
            workers,
            dropped: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Queue `command` without blocking.
    pub fn submit(&self, command: ControlCommand) -> Submission {
        let Some(tx) = &self.tx else {
            return Submission::Dropped;
        };
        match tx.try_send(command) {
            Ok(()) => Submission::Accepted,
            Err(TrySendError::Full(command)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    action = command.action(),
                    dropped_total = total,
                    "command queue full, dropping command"
                );
                Submission::Dropped
            }
            Err(TrySendError::Disconnected(_)) => Submission::Dropped,
        }
    }

    /// Commands dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Commands waiting for a worker.
    pub fn pending(&self) -> usize {
        self.tx.as_ref().map_or(0, Sender::len)
    }

    /// Close the queue, let the workers drain it, and join them.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        drop(self.tx.take());
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("command worker panicked");
            }
        }
    }
}

impl Drop for CommandQueue {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FxStore;
    use crate::surface::MemorySurface;
    use flowdeck_config::{AppConfig, FxParameterSet};

    fn dispatcher() -> (Arc<Dispatcher>, Arc<MemorySurface>) {
        let surface = Arc::new(MemorySurface::new());
        let dispatcher = Dispatcher::new(
            FxStore::new(FxParameterSet::default()),
            surface.clone(),
            Arc::new(AppConfig::default()),
        );
        (Arc::new(dispatcher), surface)
    }

    #[test]
    fn test_commands_are_processed() {
        let (dispatcher, surface) = dispatcher();
        let queue = CommandQueue::start(dispatcher.clone(), QueueConfig::default()).unwrap();

        for i in 0..20 {
            assert_eq!(
                queue.submit(ControlCommand::MediaControl {
                    key: format!("key{i}")
                }),
                Submission::Accepted
            );
        }
        queue.shutdown();

        assert_eq!(surface.media_keys().len(), 20);
    }

    #[test]
    fn test_shutdown_drains_pending() {
        let (dispatcher, _) = dispatcher();
        let queue = CommandQueue::start(
            dispatcher.clone(),
            QueueConfig {
                capacity: 8,
                workers: 1,
            },
        )
        .unwrap();
        for _ in 0..5 {
            queue.submit(ControlCommand::SetVoiceFx {
                fx_name: "reverb".to_string(),
                value: 0.3,
            });
        }
        queue.shutdown();
        assert_eq!(dispatcher.store().generation(), 5);
    }

    #[test]
    fn test_default_applies_in_submission_order() {
        let (dispatcher, _) = dispatcher();
        let queue = CommandQueue::start(dispatcher.clone(), QueueConfig::default()).unwrap();
        // A slider drag: many writes to one field, the last one must win.
        for step in 0..=50u8 {
            queue.submit(ControlCommand::SetVoiceFx {
                fx_name: "reverb".to_string(),
                value: f64::from(step) / 50.0,
            });
        }
        queue.shutdown();
        assert_eq!(dispatcher.store().read().reverb, 1.0);
        assert_eq!(dispatcher.store().generation(), 51);
    }

    #[test]
    fn test_zero_sizes_are_raised_to_one() {
        let (dispatcher, surface) = dispatcher();
        let queue = CommandQueue::start(
            dispatcher,
            QueueConfig {
                capacity: 0,
                workers: 0,
            },
        )
        .unwrap();
        assert_eq!(queue.workers.len(), 1);
        queue.submit(ControlCommand::MediaControl {
            key: "playpause".to_string(),
        });
        queue.shutdown();
        assert_eq!(surface.media_keys(), ["playpause"]);
    }
}
