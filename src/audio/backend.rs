//! The capability interface the engine drives, and the simulated backend
//! used when no output device is available.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::BackendSetting;
use crate::library::Track;

use super::sink::RodioBackend;
use super::types::{LoadedSound, SoundHandle};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot open file: {0}")]
    Open(#[from] io::Error),
    #[error("cannot decode audio: {0}")]
    Decode(String),
    #[error("no audio output device: {0}")]
    Output(String),
}

/// An audio engine able to play one loaded sound at a time.
pub trait Backend {
    fn name(&self) -> &'static str;
    /// Whether `is_active` tracks real output. When false the engine detects
    /// end-of-track from its clock alone.
    fn reports_completion(&self) -> bool;
    fn load(&mut self, track: &Track) -> Result<LoadedSound, BackendError>;
    fn play(&mut self, handle: SoundHandle);
    fn pause(&mut self, handle: SoundHandle);
    fn resume(&mut self, handle: SoundHandle);
    fn stop(&mut self, handle: SoundHandle);
    fn is_active(&self, handle: SoundHandle) -> bool;
    fn set_volume(&mut self, volume: f32);
}

/// How the simulated backend decides a track's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulatedLength {
    /// 30 s plus 15 s per step of `id % 5`, giving 30-90 s.
    #[default]
    ById,
    Fixed(Duration),
}

impl SimulatedLength {
    pub fn length_for(&self, track: &Track) -> Duration {
        match self {
            Self::ById => Duration::from_secs(30 + u64::from(track.id % 5) * 15),
            Self::Fixed(d) => *d,
        }
    }
}

/// Plays nothing; hands out handles and lengths so the clock can time playback.
#[derive(Debug)]
pub struct SimulatedBackend {
    length: SimulatedLength,
    next_handle: u64,
    active: Option<SoundHandle>,
    volume: f32,
}

impl SimulatedBackend {
    pub fn new(length: SimulatedLength) -> Self {
        Self {
            length,
            next_handle: 0,
            active: None,
            volume: 1.0,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Backend for SimulatedBackend {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn reports_completion(&self) -> bool {
        false
    }

    fn load(&mut self, track: &Track) -> Result<LoadedSound, BackendError> {
        self.next_handle += 1;
        let loaded = LoadedSound {
            handle: SoundHandle(self.next_handle),
            length: self.length.length_for(track),
        };
        debug!(track = %track.display_name(), length = ?loaded.length, "simulated load");
        Ok(loaded)
    }

    fn play(&mut self, handle: SoundHandle) {
        self.active = Some(handle);
    }

    fn pause(&mut self, _handle: SoundHandle) {}

    fn resume(&mut self, _handle: SoundHandle) {}

    fn stop(&mut self, handle: SoundHandle) {
        if self.active == Some(handle) {
            self.active = None;
        }
    }

    fn is_active(&self, handle: SoundHandle) -> bool {
        self.active == Some(handle)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

/// Pick the backend once at startup.
///
/// `Auto` falls back to simulation when the output device cannot be opened;
/// `Native` reports that failure instead.
pub fn select_backend(
    setting: BackendSetting,
    simulated: SimulatedLength,
) -> Result<Box<dyn Backend>, BackendError> {
    match setting {
        BackendSetting::Simulated => {
            info!("audio backend: simulated");
            Ok(Box::new(SimulatedBackend::new(simulated)))
        }
        BackendSetting::Native => {
            let backend = RodioBackend::open()?;
            info!("audio backend: native");
            Ok(Box::new(backend))
        }
        BackendSetting::Auto => match RodioBackend::open() {
            Ok(backend) => {
                info!("audio backend: native");
                Ok(Box::new(backend))
            }
            Err(e) => {
                warn!(error = %e, "audio output unavailable, playback will be simulated");
                Ok(Box::new(SimulatedBackend::new(simulated)))
            }
        },
    }
}
