//! The FX parameter store.
//!
//! One writer at a time, any number of lock-free readers. Every write builds
//! a complete new [`FxParameterSet`] under the writer lock and publishes it
//! through an [`ArcSwap`], so a reader always sees one whole set: never a
//! mix of two writes.
//!
//! The audio callback reads through [`ParameterSource`], which only loads
//! the published `Arc` and never touches the writer lock or the file system.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use flowdeck_config::{FxParam, FxParameterSet, FxValueError};
use parking_lot::Mutex;
use thiserror::Error;

/// Pending notifications kept per subscriber before new ones are dropped.
const SUBSCRIBER_CAPACITY: usize = 16;

/// Errors from the persisted state file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the file failed.
    #[error("state file '{path}': {source}")]
    Io {
        /// The state file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a flat `{pitch, reverb, echo}` object.
    #[error("state file '{path}' is malformed: {source}")]
    Parse {
        /// The state file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but holds an unstorable value.
    #[error("state file '{path}' holds an invalid value: {source}")]
    Invalid {
        /// The state file.
        path: PathBuf,
        /// What was wrong with the value.
        #[source]
        source: FxValueError,
    },
}

/// Durable copy of the parameters as a flat JSON object.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// State file at `path`. Nothing is touched until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a previously saved set. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<FxParameterSet>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let set: FxParameterSet =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        set.validate().map_err(|source| StoreError::Invalid {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(set))
    }

    /// Atomically replace the file contents with `set`.
    pub fn save(&self, set: &FxParameterSet) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_vec(set).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.temp_path();
        let mut file = std::fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(&json).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Non-blocking access to the latest parameter set.
///
/// Called once per audio block. Implementations must not block, lock or
/// allocate; `None` means "nothing available right now" and the caller keeps
/// using what it had.
pub trait ParameterSource: Send + Sync {
    /// Latest complete parameter set, if one can be had without waiting.
    fn try_snapshot(&self) -> Option<FxParameterSet>;
}

impl<T: ParameterSource + ?Sized> ParameterSource for Arc<T> {
    fn try_snapshot(&self) -> Option<FxParameterSet> {
        (**self).try_snapshot()
    }
}

struct WriterState {
    state_file: Option<StateFile>,
    subscribers: Vec<Sender<Arc<FxParameterSet>>>,
}

struct StoreInner {
    current: ArcSwap<FxParameterSet>,
    generation: AtomicU64,
    writer: Mutex<WriterState>,
}

/// Shared FX parameter store. Cloning is cheap and clones share state.
///
/// ```rust
/// use flowdeck_config::{FxParam, FxParameterSet};
/// use flowdeck_control::FxStore;
///
/// let store = FxStore::new(FxParameterSet::default());
/// store.write_partial(FxParam::Reverb, 0.4).unwrap();
/// assert_eq!(store.read().reverb, 0.4);
/// assert_eq!(store.read().pitch, 0.5);
/// ```
#[derive(Clone)]
pub struct FxStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for FxStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FxStore")
            .field("current", &self.read())
            .field("generation", &self.generation())
            .finish()
    }
}

impl FxStore {
    /// In-memory store starting at `initial`.
    pub fn new(initial: FxParameterSet) -> Self {
        Self::build(initial, None)
    }

    /// Store that persists every write to `state_file`.
    ///
    /// `initial` is written out immediately; a failure is logged and the
    /// store still starts.
    pub fn with_state_file(initial: FxParameterSet, state_file: StateFile) -> Self {
        if let Err(e) = state_file.save(&initial) {
            tracing::warn!(error = %e, "failed to persist initial fx state");
        }
        Self::build(initial, Some(state_file))
    }

    fn build(initial: FxParameterSet, state_file: Option<StateFile>) -> Self {
        debug_assert!(initial.validate().is_ok());
        Self {
            inner: Arc::new(StoreInner {
                current: ArcSwap::from_pointee(initial),
                generation: AtomicU64::new(0),
                writer: Mutex::new(WriterState {
                    state_file,
                    subscribers: Vec::new(),
                }),
            }),
        }
    }

    /// Copy of the complete current set.
    pub fn read(&self) -> FxParameterSet {
        **self.inner.current.load()
    }

    /// The current set as published.
    pub fn snapshot(&self) -> Arc<FxParameterSet> {
        self.inner.current.load_full()
    }

    /// Number of writes published so far.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Replace one field, keeping the others. Returns the new set.
    ///
    /// The value is checked before the lock is taken; a rejected value
    /// leaves the store untouched.
    pub fn write_partial(
        &self,
        param: FxParam,
        value: f64,
    ) -> Result<FxParameterSet, FxValueError> {
        flowdeck_config::check_value(param, value)?;

        let mut writer = self.inner.writer.lock();
        let next = self.read().with(param, value)?;
        self.commit(&mut writer, next);
        Ok(next)
    }

    /// Replace the whole set.
    pub fn write_full(&self, set: FxParameterSet) -> Result<(), FxValueError> {
        set.validate()?;

        let mut writer = self.inner.writer.lock();
        self.commit(&mut writer, set);
        Ok(())
    }

    /// Receive every set published from now on.
    ///
    /// Notifications that would overflow a slow receiver are dropped; the
    /// receiver can always fall back to [`read`](Self::read).
    pub fn subscribe(&self) -> Receiver<Arc<FxParameterSet>> {
        let (tx, rx) = crossbeam_channel::bounded(SUBSCRIBER_CAPACITY);
        self.inner.writer.lock().subscribers.push(tx);
        rx
    }

    /// Path of the state file, if the store persists.
    pub fn state_file_path(&self) -> Option<PathBuf> {
        self.inner
            .writer
            .lock()
            .state_file
            .as_ref()
            .map(|f| f.path().to_path_buf())
    }

    fn commit(&self, writer: &mut WriterState, next: FxParameterSet) {
        if let Some(file) = &writer.state_file
            && let Err(e) = file.save(&next)
        {
            tracing::warn!(error = %e, "failed to persist fx state; keeping in-memory value");
        }

        let next = Arc::new(next);
        self.inner.current.store(Arc::clone(&next));
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;

        writer
            .subscribers
            .retain(|tx| match tx.try_send(Arc::clone(&next)) {
                Ok(()) | Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            });

        tracing::debug!(
            generation,
            pitch = next.pitch,
            reverb = next.reverb,
            echo = next.echo,
            "fx parameters published"
        );
    }
}

impl ParameterSource for FxStore {
    #[inline]
    fn try_snapshot(&self) -> Option<FxParameterSet> {
        Some(self.read())
    }
}
