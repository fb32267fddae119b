//! The OS audio surface.
//!
//! Volume, mute, media keys and program launching live behind
//! [`AudioSurface`] so the dispatcher and snapshot code never see a
//! platform API. [`MemorySurface`] is the in-process implementation used by
//! the CLI when no OS binding is available, and by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Volume and mute of one channel (master, mic or an app session).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    /// Scalar volume in `[0, 1]`; `-1` marks a group with no live session.
    pub level: f32,
    /// Mute flag.
    pub muted: bool,
}

impl ChannelState {
    /// Unmuted channel at `level`.
    pub const fn new(level: f32) -> Self {
        Self {
            level,
            muted: false,
        }
    }

    /// Placeholder reported for a mixer group with no running app.
    pub const NO_SESSION: ChannelState = ChannelState {
        level: -1.0,
        muted: false,
    };
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Failure reported by an [`AudioSurface`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The endpoint or session could not be reached.
    #[error("audio surface unavailable: {0}")]
    Unavailable(String),

    /// The surface refused the request.
    #[error("audio surface rejected request: {0}")]
    Rejected(String),
}

/// Operations the control surface performs on the host's audio system.
///
/// Group operations take the configured app list of the group; a session
/// belongs to the group when its process name is in that list.
pub trait AudioSurface: Send + Sync {
    /// Master output volume and mute.
    fn master_state(&self) -> Result<ChannelState, SurfaceError>;
    /// Set master output volume.
    fn set_master_volume(&self, level: f32) -> Result<(), SurfaceError>;
    /// Set master output mute.
    fn set_master_mute(&self, muted: bool) -> Result<(), SurfaceError>;

    /// State of the first live session among `apps`, in list order.
    /// `Ok(None)` when none of them is running.
    fn group_state(&self, apps: &[String]) -> Result<Option<ChannelState>, SurfaceError>;
    /// Set the volume of every live session among `apps`.
    fn set_group_volume(&self, apps: &[String], level: f32) -> Result<(), SurfaceError>;
    /// Set the mute of every live session among `apps`.
    fn set_group_mute(&self, apps: &[String], muted: bool) -> Result<(), SurfaceError>;

    /// Default microphone volume and mute.
    fn mic_state(&self) -> Result<ChannelState, SurfaceError>;
    /// Set default microphone mute.
    fn set_mic_mute(&self, muted: bool) -> Result<(), SurfaceError>;
    /// Set default microphone volume.
    fn set_mic_volume(&self, level: f32) -> Result<(), SurfaceError>;

    /// Press a media key (`playpause`, `nexttrack`, ...).
    fn send_media_key(&self, key: &str) -> Result<(), SurfaceError>;
    /// Start a program.
    fn launch(&self, executable: &str) -> Result<(), SurfaceError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    master: ChannelState,
    mic: ChannelState,
    sessions: HashMap<String, ChannelState>,
    media_keys: Vec<String>,
    launches: Vec<String>,
}

/// In-memory [`AudioSurface`].
///
/// Holds a master channel, a microphone and a set of app sessions keyed by
/// process name. Media keys and launches are recorded instead of performed.
/// [`set_failing`](Self::set_failing) makes every call fail, to exercise the
/// fallback paths.
///
/// ```rust
/// use flowdeck_control::{AudioSurface, ChannelState, MemorySurface};
///
/// let surface = MemorySurface::new().with_session("Spotify.exe", ChannelState::new(0.4));
/// let apps = vec!["Spotify.exe".to_string()];
/// surface.set_group_volume(&apps, 0.9).unwrap();
/// assert_eq!(surface.group_state(&apps).unwrap().unwrap().level, 0.9);
/// ```
#[derive(Debug)]
pub struct MemorySurface {
    state: Mutex<MemoryState>,
    failing: AtomicBool,
}

impl MemorySurface {
    /// Surface with master and mic at full volume and no sessions.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                master: ChannelState::new(1.0),
                mic: ChannelState::new(1.0),
                ..MemoryState::default()
            }),
            failing: AtomicBool::new(false),
        }
    }

    /// Add a live session for `app`.
    pub fn with_session(self, app: impl Into<String>, state: ChannelState) -> Self {
        self.add_session(app, state);
        self
    }

    /// Add or replace a live session.
    pub fn add_session(&self, app: impl Into<String>, state: ChannelState) {
        self.state.lock().sessions.insert(app.into(), state);
    }

    /// Make every subsequent call fail with [`SurfaceError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Media keys pressed so far.
    pub fn media_keys(&self) -> Vec<String> {
        self.state.lock().media_keys.clone()
    }

    /// Programs launched so far.
    pub fn launches(&self) -> Vec<String> {
        self.state.lock().launches.clone()
    }

    fn check(&self) -> Result<(), SurfaceError> {
        if self.failing.load(Ordering::Relaxed) {
            Err(SurfaceError::Unavailable("memory surface set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSurface for MemorySurface {
    fn master_state(&self) -> Result<ChannelState, SurfaceError> {
        self.check()?;
        Ok(self.state.lock().master)
    }

    fn set_master_volume(&self, level: f32) -> Result<(), SurfaceError> {
        self.check()?;
        self.state.lock().master.level = level;
        Ok(())
    }

    fn set_master_mute(&self, muted: bool) -> Result<(), SurfaceError> {
        self.check()?;
        self.state.lock().master.muted = muted;
        Ok(())
    }

    fn group_state(&self, apps: &[String]) -> Result<Option<ChannelState>, SurfaceError> {
        self.check()?;
        let state = self.state.lock();
        Ok(apps.iter().find_map(|app| state.sessions.get(app).copied()))
    }

    fn set_group_volume(&self, apps: &[String], level: f32) -> Result<(), SurfaceError> {
        self.check()?;
        let mut state = self.state.lock();
        for app in apps {
            if let Some(session) = state.sessions.get_mut(app) {
                session.level = level;
            }
        }
        Ok(())
    }

    fn set_group_mute(&self, apps: &[String], muted: bool) -> Result<(), SurfaceError> {
        self.check()?;
        let mut state = self.state.lock();
        for app in apps {
            if let Some(session) = state.sessions.get_mut(app) {
                session.muted = muted;
            }
        }
        Ok(())
    }

    fn mic_state(&self) -> Result<ChannelState, SurfaceError> {
        self.check()?;
        Ok(self.state.lock().mic)
    }

    fn set_mic_mute(&self, muted: bool) -> Result<(), SurfaceError> {
        self.check()?;
        self.state.lock().mic.muted = muted;
        Ok(())
    }

    fn set_mic_volume(&self, level: f32) -> Result<(), SurfaceError> {
        self.check()?;
        self.state.lock().mic.level = level;
        Ok(())
    }

    fn send_media_key(&self, key: &str) -> Result<(), SurfaceError> {
        self.check()?;
        if key.is_empty() {
            return Err(SurfaceError::Rejected("empty media key".to_string()));
        }
        self.state.lock().media_keys.push(key.to_string());
        Ok(())
    }

    fn launch(&self, executable: &str) -> Result<(), SurfaceError> {
        self.check()?;
        if executable.is_empty() {
            return Err(SurfaceError::Rejected("empty executable".to_string()));
        }
        self.state.lock().launches.push(executable.to_string());
        Ok(())
    }
}
