use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{PlayerError, Result};
use crate::library::Track;

use super::backend::Backend;
use super::clock::{Clock, PositionClock};
use super::types::{LoadedSound, PlaybackState};

/// The playback state machine: one loaded track, a backend and a position clock.
///
/// End-of-track is found by polling [`AudioPlayer::tick`]. A natural finish
/// sets a flag that a manual [`AudioPlayer::stop`] never sets.
pub struct AudioPlayer {
    backend: Box<dyn Backend>,
    clock: PositionClock,
    end_tolerance: Duration,
    state: PlaybackState,
    track: Option<Track>,
    /// Backend sound for `track`; released on stop and natural finish.
    sound: Option<LoadedSound>,
    length: Duration,
    finished: bool,
    volume: f32,
}

impl AudioPlayer {
    pub fn new(backend: Box<dyn Backend>, clock: Rc<dyn Clock>, end_tolerance: Duration) -> Self {
        Self {
            backend,
            clock: PositionClock::new(clock),
            end_tolerance,
            state: PlaybackState::Stopped,
            track: None,
            sound: None,
            length: Duration::ZERO,
            finished: false,
            volume: 1.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn elapsed(&self) -> Duration {
        match self.state {
            PlaybackState::Stopped => Duration::ZERO,
            _ => self.clock.elapsed(),
        }
    }

    pub fn remaining(&self) -> Duration {
        self.clock.remaining()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Clamp to `0.0..=1.0` and apply; returns the value in effect.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            self.volume
        };
        self.backend.set_volume(self.volume);
        self.volume
    }

    pub fn finished_naturally(&self) -> bool {
        self.finished
    }

    /// Read and clear the natural-finish flag.
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished)
    }

    fn release_sound(&mut self) {
        if let Some(sound) = self.sound.take() {
            self.backend.stop(sound.handle);
        }
    }

    fn load_sound(&mut self, track: &Track) -> Result<LoadedSound> {
        let sound = self
            .backend
            .load(track)
            .map_err(|e| PlayerError::LoadFailure {
                path: track.path.clone(),
                reason: e.to_string(),
            })?;
        self.sound = Some(sound);
        self.length = sound.length;
        Ok(sound)
    }

    /// Load `track`, stopping whatever was playing. Does not start playback.
    ///
    /// On failure nothing is loaded and the state stays Stopped.
    pub fn load(&mut self, track: &Track) -> Result<Duration> {
        self.release_sound();
        self.state = PlaybackState::Stopped;
        self.finished = false;
        self.track = None;
        self.length = Duration::ZERO;

        match self.load_sound(track) {
            Ok(sound) => {
                self.track = Some(track.clone());
                self.clock.reset(sound.length);
                info!(track = %track.display_name(), length = ?sound.length, "loaded");
                Ok(sound.length)
            }
            Err(e) => {
                self.clock.reset(Duration::ZERO);
                warn!(error = %e, "load failed");
                Err(e)
            }
        }
    }

    /// Start the loaded track from the top, or resume it when paused.
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => {
                self.resume();
                Ok(())
            }
            PlaybackState::Stopped => {
                let Some(track) = self.track.clone() else {
                    return Err(PlayerError::NothingToPlay);
                };
                // A stopped or finished track released its sound; decode it again.
                let sound = match self.sound {
                    Some(sound) => sound,
                    None => self.load_sound(&track)?,
                };

                self.backend.play(sound.handle);
                self.clock.start(sound.length);
                self.state = PlaybackState::Playing;
                self.finished = false;
                debug!(track = %track.display_name(), "playing");
                Ok(())
            }
        }
    }

    /// Playing -> Paused. Returns false (and does nothing) from any other state.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        if let Some(sound) = self.sound {
            self.backend.pause(sound.handle);
        }
        self.clock.mark_pause_start();
        self.state = PlaybackState::Paused;
        true
    }

    /// Paused -> Playing. Returns false (and does nothing) from any other state.
    pub fn resume(&mut self) -> bool {
        if self.state != PlaybackState::Paused {
            return false;
        }
        if let Some(sound) = self.sound {
            self.backend.resume(sound.handle);
        }
        self.clock.mark_resume();
        self.state = PlaybackState::Playing;
        true
    }

    /// Manual stop from any state. Never counts as a natural finish.
    pub fn stop(&mut self) {
        self.release_sound();
        self.state = PlaybackState::Stopped;
        self.finished = false;
        self.clock.reset(self.length);
    }

    /// Poll for end-of-track. On a natural finish the state becomes Stopped
    /// and the finish flag is raised.
    pub fn tick(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(sound) = self.sound else {
            return;
        };

        let ended = if self.backend.reports_completion() {
            !self.backend.is_active(sound.handle)
        } else {
            self.clock.has_reached_end(self.end_tolerance)
        };

        if ended {
            self.release_sound();
            self.state = PlaybackState::Stopped;
            self.finished = true;
            self.clock.reset(self.length);
            if let Some(track) = &self.track {
                info!(track = %track.display_name(), "finished naturally");
            }
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.release_sound();
    }
}
