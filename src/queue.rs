//! The active play queue and its advance policy.
//!
//! A queue is a list of tracks (copied out of the catalog or a playlist)
//! and a cursor. `next`/`prev` walk it linearly with wrap-around, or through
//! a shuffled permutation when random mode is on.

mod random;

use tracing::debug;

use crate::error::{PlayerError, Result};
use crate::library::Track;

pub use random::RandomCursor;

/// Where the queued tracks came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueueSource {
    #[default]
    AllSongs,
    Playlist(String),
}

/// Outcome of a `next`/`prev` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub index: usize,
    /// The cursor went past an end of the queue.
    pub wrapped: bool,
    /// A fresh random order was generated to continue.
    pub reshuffled: bool,
}

#[derive(Debug, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    source: QueueSource,
    current: Option<usize>,
    random: Option<RandomCursor>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn source(&self) -> &QueueSource {
        &self.source
    }

    pub fn playlist_name(&self) -> Option<&str> {
        match &self.source {
            QueueSource::Playlist(name) => Some(name),
            QueueSource::AllSongs => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn is_random(&self) -> bool {
        self.random.is_some()
    }

    /// Swap in a new set of tracks. The cursor is cleared and, in random
    /// mode, a new permutation replaces the old one.
    pub fn replace(&mut self, tracks: Vec<Track>, source: QueueSource) {
        debug!(len = tracks.len(), ?source, "queue replaced");
        self.tracks = tracks;
        self.source = source;
        self.current = None;
        if self.random.is_some() {
            self.random = Some(RandomCursor::new(self.tracks.len()));
        }
    }

    /// Turn random mode on or off.
    ///
    /// Turning it on shuffles the current queue and places the random
    /// cursor on the playing track, so `next` continues from there.
    pub fn set_random(&mut self, on: bool) {
        if on == self.random.is_some() {
            return;
        }
        self.random = if on {
            let mut cursor = RandomCursor::new(self.tracks.len());
            if let Some(i) = self.current {
                cursor.sync_to(i);
            }
            Some(cursor)
        } else {
            None
        };
    }

    /// Flip random mode, returning the new setting.
    pub fn toggle_random(&mut self) -> bool {
        self.set_random(!self.is_random());
        self.is_random()
    }

    /// Point the cursor at `index` (0-based).
    pub fn select(&mut self, index: usize) -> Result<&Track> {
        if self.tracks.is_empty() {
            return Err(PlayerError::EmptyQueue);
        }
        if index >= self.tracks.len() {
            return Err(PlayerError::InvalidIndex {
                index,
                len: self.tracks.len(),
            });
        }
        self.current = Some(index);
        if let Some(cursor) = self.random.as_mut() {
            cursor.sync_to(index);
        }
        Ok(&self.tracks[index])
    }

    pub fn advance_next(&mut self) -> Result<Advance> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(PlayerError::EmptyQueue);
        }

        let advance = match self.random.as_mut() {
            Some(cursor) => cursor.next(),
            None => {
                let (index, wrapped) = match self.current {
                    None => (0, false),
                    Some(c) if c + 1 >= len => (0, true),
                    Some(c) => (c + 1, false),
                };
                Advance {
                    index,
                    wrapped,
                    reshuffled: false,
                }
            }
        };
        self.current = Some(advance.index);
        Ok(advance)
    }

    pub fn advance_prev(&mut self) -> Result<Advance> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(PlayerError::EmptyQueue);
        }

        let advance = match self.random.as_mut() {
            Some(cursor) => cursor.prev(),
            None => {
                let (index, wrapped) = match self.current {
                    None | Some(0) => (len - 1, true),
                    Some(c) => (c - 1, false),
                };
                Advance {
                    index,
                    wrapped,
                    reshuffled: false,
                }
            }
        };
        self.current = Some(advance.index);
        Ok(advance)
    }
}

#[cfg(test)]
mod tests;
