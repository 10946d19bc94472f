//! The `App` couples the playback engine to the queue: it owns the catalog,
//! the playlists and the active queue, and turns "track finished" into
//! "start the next one".

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{AudioPlayer, LoopMode, PlaybackState};
use crate::config::Prefs;
use crate::error::{PlayerError, Result};
use crate::library::{self, Track};
use crate::playlist::{Playlist, PlaylistRegistry};
use crate::presence::PresenceHandle;
use crate::queue::{Queue, QueueSource};

/// A track the app just started.
#[derive(Debug, Clone, PartialEq)]
pub struct Started {
    pub index: usize,
    pub track: Track,
    /// The queue wrapped around to get here.
    pub wrapped: bool,
    pub reshuffled: bool,
}

/// What a driver tick did after the current track finished by itself.
#[derive(Debug)]
pub enum AutoAdvance {
    /// The same queue slot is playing again (loop-one).
    Replayed(Started),
    /// The queue moved on.
    Advanced(Started),
    /// Nothing could be started; playback stays stopped until the next command.
    Halted(PlayerError),
}

/// Position of the loaded track, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub elapsed: Duration,
    pub length: Duration,
    pub remaining: Duration,
}

pub struct App {
    engine: AudioPlayer,
    queue: Queue,
    catalog: Vec<Track>,
    playlists: PlaylistRegistry,
    presence: PresenceHandle,

    pub loop_mode: LoopMode,
    pub show_progress: bool,
}

impl App {
    pub fn new(engine: AudioPlayer, presence: PresenceHandle) -> Self {
        Self {
            engine,
            queue: Queue::new(),
            catalog: Vec::new(),
            playlists: PlaylistRegistry::new(),
            presence,
            loop_mode: LoopMode::LoopAll,
            show_progress: false,
        }
    }

    pub fn engine(&self) -> &AudioPlayer {
        &self.engine
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn catalog(&self) -> &[Track] {
        &self.catalog
    }

    pub fn playlists(&self) -> &PlaylistRegistry {
        &self.playlists
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    /// Apply persisted preferences (volume, loop mode, progress display).
    pub fn apply_prefs(&mut self, prefs: &Prefs) {
        self.engine.set_volume(prefs.volume);
        self.loop_mode = prefs.loop_mode;
        self.show_progress = prefs.show_progress;
    }

    pub fn prefs(&self) -> Prefs {
        Prefs {
            volume: self.engine.volume(),
            show_progress: self.show_progress,
            loop_mode: self.loop_mode,
        }
    }

    /// Install playlists read from disk, resolving their tracks against the
    /// current catalog.
    pub fn set_playlists(&mut self, mut playlists: PlaylistRegistry) {
        let unmatched = playlists.resolve_against(&self.catalog);
        if unmatched > 0 {
            warn!(unmatched, "playlist tracks not found in the catalog");
        }
        self.playlists = playlists;
    }

    /// Replace the catalog after a scan. The queue switches to all songs;
    /// whatever is playing keeps playing.
    pub fn set_catalog(&mut self, tracks: Vec<Track>) {
        info!(count = tracks.len(), "catalog replaced");
        self.catalog = tracks;
        let unmatched = self.playlists.resolve_against(&self.catalog);
        if unmatched > 0 {
            debug!(unmatched, "playlist tracks not in the new catalog");
        }
        self.use_all_songs();
    }

    /// Queue the whole catalog. Returns the queue length.
    pub fn use_all_songs(&mut self) -> usize {
        self.queue.replace(self.catalog.clone(), QueueSource::AllSongs);
        if self.engine.state() == PlaybackState::Stopped {
            self.presence.report_browsing(self.catalog.len());
        }
        self.queue.len()
    }

    pub fn search(&self, query: &str) -> Vec<usize> {
        library::search(&self.catalog, query)
    }

    fn report_current(&self) {
        let Some(track) = self.engine.current_track() else {
            self.presence.report_browsing(self.catalog.len());
            return;
        };
        let playlist = self.queue.playlist_name();
        match self.engine.state() {
            PlaybackState::Playing => self.presence.report_playing(&track.title, &track.artist, playlist),
            PlaybackState::Paused => self.presence.report_paused(&track.title, &track.artist, playlist),
            PlaybackState::Stopped => self.presence.report_browsing(self.catalog.len()),
        }
    }

    /// Load and play the track under the queue cursor.
    fn start_current(&mut self, wrapped: bool, reshuffled: bool) -> Result<Started> {
        let (index, track) = match (self.queue.current_index(), self.queue.current()) {
            (Some(i), Some(t)) => (i, t.clone()),
            _ => return Err(PlayerError::EmptyQueue),
        };

        let result = self.engine.load(&track).and_then(|_| self.engine.play());
        self.report_current();
        result?;

        Ok(Started {
            index,
            track,
            wrapped,
            reshuffled,
        })
    }

    /// Play queue slot `index` (0-based) from the top.
    pub fn play_index(&mut self, index: usize) -> Result<Started> {
        self.queue.select(index)?;
        self.start_current(false, false)
    }

    /// Resume when paused; otherwise start the track under the cursor, or
    /// advance onto the queue when nothing is selected (the first slot, or
    /// the head of the permutation in random mode). `None` means nothing
    /// new was started.
    pub fn play(&mut self) -> Result<Option<Started>> {
        match self.engine.state() {
            PlaybackState::Playing => Ok(None),
            PlaybackState::Paused => {
                self.resume()?;
                Ok(None)
            }
            PlaybackState::Stopped => {
                if self.queue.is_empty() {
                    return Err(PlayerError::EmptyQueue);
                }
                if self.queue.current_index().is_none() {
                    return self.next().map(Some);
                }
                self.start_current(false, false).map(Some)
            }
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        if !self.engine.pause() {
            return Err(match self.engine.state() {
                PlaybackState::Paused => PlayerError::AlreadyPaused,
                _ => PlayerError::NotPlaying,
            });
        }
        self.report_current();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if !self.engine.resume() {
            return Err(match self.engine.state() {
                PlaybackState::Playing => PlayerError::AlreadyPlaying,
                _ => PlayerError::NotPlaying,
            });
        }
        self.report_current();
        Ok(())
    }

    /// Pause when playing, resume when paused. Returns the new state.
    pub fn pause_resume(&mut self) -> Result<PlaybackState> {
        match self.engine.state() {
            PlaybackState::Playing => self.pause()?,
            PlaybackState::Paused => self.resume()?,
            PlaybackState::Stopped => return Err(PlayerError::NotPlaying),
        }
        Ok(self.engine.state())
    }

    /// Manual stop. Never triggers auto-advance.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.report_current();
    }

    pub fn next(&mut self) -> Result<Started> {
        let adv = self.queue.advance_next()?;
        self.start_current(adv.wrapped, adv.reshuffled)
    }

    pub fn prev(&mut self) -> Result<Started> {
        let adv = self.queue.advance_prev()?;
        self.start_current(adv.wrapped, adv.reshuffled)
    }

    /// Set volume from a `0.0..=1.0` fraction; returns the value in effect.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.engine.set_volume(volume)
    }

    pub fn toggle_random(&mut self) -> bool {
        self.queue.toggle_random()
    }

    pub fn toggle_loop(&mut self) -> LoopMode {
        self.loop_mode = self.loop_mode.toggled();
        self.loop_mode
    }

    pub fn toggle_progress(&mut self) -> bool {
        self.show_progress = !self.show_progress;
        self.show_progress
    }

    pub fn progress(&self) -> Option<Progress> {
        if self.engine.state() == PlaybackState::Stopped {
            return None;
        }
        Some(Progress {
            elapsed: self.engine.elapsed(),
            length: self.engine.length(),
            remaining: self.engine.remaining(),
        })
    }

    /// One driver tick: poll the engine and, on a natural finish, replay or
    /// advance. A manual stop never reaches the advance branch because only
    /// the engine's finish flag gates it.
    pub fn tick(&mut self) -> Option<AutoAdvance> {
        self.engine.tick();
        if !self.engine.take_finished() {
            return None;
        }

        let outcome = if self.loop_mode == LoopMode::LoopOne && self.queue.current().is_some() {
            self.start_current(false, false).map(AutoAdvance::Replayed)
        } else {
            self.next().map(AutoAdvance::Advanced)
        };

        Some(match outcome {
            Ok(adv) => adv,
            Err(e) => {
                warn!(error = %e, "auto-advance halted");
                self.report_current();
                AutoAdvance::Halted(e)
            }
        })
    }

    pub fn create_playlist(&mut self, name: &str) -> Result<()> {
        self.playlists.create(name)
    }

    pub fn delete_playlist(&mut self, name: &str) -> Result<Playlist> {
        self.playlists.delete(name)
    }

    pub fn playlist(&self, name: &str) -> Result<&Playlist> {
        self.playlists.get(name)
    }

    /// Add catalog entry `index` (0-based) to a playlist.
    pub fn add_to_playlist(&mut self, name: &str, index: usize) -> Result<&Track> {
        let track = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(PlayerError::InvalidIndex {
                index,
                len: self.catalog.len(),
            })?;
        self.playlists.add(name, track)?;
        Ok(&self.catalog[index])
    }

    pub fn remove_from_playlist(&mut self, name: &str, index: usize) -> Result<Track> {
        self.playlists.remove(name, index)
    }

    /// Queue a playlist and start its first track (a random one in random mode).
    pub fn play_playlist(&mut self, name: &str) -> Result<Started> {
        let playlist = self.playlists.get(name)?;
        if playlist.is_empty() {
            return Err(PlayerError::PlaylistEmpty(name.to_string()));
        }
        let tracks = playlist.tracks.clone();
        self.queue.replace(tracks, QueueSource::Playlist(name.to_string()));
        self.next()
    }

    /// Stop playback and release the backend sound; presence goes idle.
    pub fn shutdown(&mut self) {
        self.engine.stop();
        self.presence.report_idle();
        info!("player shut down");
    }
}
