//! Audio-related small types.
//!
//! Playback state, looping mode and the handle the backend hands out for a
//! loaded sound.

use std::time::Duration;

/// The playback state of the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Advance through the queue, wrapping around at either end.
    #[default]
    LoopAll,
    /// Repeat the current song when it ends.
    LoopOne,
}

impl LoopMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::LoopAll => Self::LoopOne,
            Self::LoopOne => Self::LoopAll,
        }
    }
}

/// Opaque id for a sound loaded into a backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// What a backend reports after loading a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadedSound {
    pub handle: SoundHandle,
    /// Track length; zero when the backend cannot tell.
    pub length: Duration,
}
