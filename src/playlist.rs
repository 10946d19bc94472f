//! Named playlists and the registry that owns them.
//!
//! The registry is a plain value owned by the player; persistence lives in
//! `playlist::store`.

mod store;

use std::collections::BTreeMap;

use tracing::info;

use crate::error::{PlayerError, Result};
use crate::library::Track;

pub use store::{load, parse, render, save};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    pub tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// All playlists, kept sorted by name.
#[derive(Debug, Default)]
pub struct PlaylistRegistry {
    playlists: BTreeMap<String, Playlist>,
}

impl PlaylistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.playlists.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.values()
    }

    pub fn get(&self, name: &str) -> Result<&Playlist> {
        self.playlists
            .get(name)
            .ok_or_else(|| PlayerError::PlaylistNotFound(name.to_string()))
    }

    pub fn create(&mut self, name: &str) -> Result<()> {
        if self.playlists.contains_key(name) {
            return Err(PlayerError::PlaylistExists(name.to_string()));
        }
        self.playlists.insert(name.to_string(), Playlist::new(name));
        info!(playlist = name, "playlist created");
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<Playlist> {
        let removed = self
            .playlists
            .remove(name)
            .ok_or_else(|| PlayerError::PlaylistNotFound(name.to_string()))?;
        info!(playlist = name, "playlist deleted");
        Ok(removed)
    }

    pub fn add(&mut self, name: &str, track: Track) -> Result<()> {
        let playlist = self
            .playlists
            .get_mut(name)
            .ok_or_else(|| PlayerError::PlaylistNotFound(name.to_string()))?;
        playlist.tracks.push(track);
        Ok(())
    }

    /// Remove the track at `index` (0-based) and return it.
    pub fn remove(&mut self, name: &str, index: usize) -> Result<Track> {
        let playlist = self
            .playlists
            .get_mut(name)
            .ok_or_else(|| PlayerError::PlaylistNotFound(name.to_string()))?;
        if index >= playlist.tracks.len() {
            return Err(PlayerError::InvalidIndex {
                index,
                len: playlist.tracks.len(),
            });
        }
        Ok(playlist.tracks.remove(index))
    }

    /// Fill in ids and lengths from the catalog for tracks read from disk.
    ///
    /// Matching is by artist and title; unmatched tracks keep id 0.
    pub fn resolve_against(&mut self, catalog: &[Track]) -> usize {
        let mut unmatched = 0;
        for track in self.playlists.values_mut().flat_map(|p| p.tracks.iter_mut()) {
            match catalog.iter().find(|c| *c == track) {
                Some(known) => {
                    track.id = known.id;
                    track.duration = known.duration;
                }
                None => {
                    track.id = 0;
                    unmatched += 1;
                }
            }
        }
        unmatched
    }
}

#[cfg(test)]
mod tests;
