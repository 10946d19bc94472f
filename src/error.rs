//! Error types surfaced by the player core.
//!
//! Every variant renders as a single user-facing line; the command shell
//! prints it verbatim.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// The backend could not open or decode a track.
    #[error("failed to load {}: {reason}", .path.display())]
    LoadFailure { path: PathBuf, reason: String },

    /// Index given on the command line is outside the list (stored 0-based).
    #[error("invalid song index {} (valid range is 1-{len})", .index + 1)]
    InvalidIndex { index: usize, len: usize },

    #[error("no songs in queue")]
    EmptyQueue,

    #[error("nothing to play")]
    NothingToPlay,

    #[error("no song is currently playing")]
    NotPlaying,

    #[error("song is already playing")]
    AlreadyPlaying,

    #[error("song is already paused")]
    AlreadyPaused,

    #[error("playlist '{0}' not found")]
    PlaylistNotFound(String),

    #[error("playlist '{0}' already exists")]
    PlaylistExists(String),

    #[error("playlist '{0}' is empty")]
    PlaylistEmpty(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;

/// Failure reading or writing one of the on-disk text stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
