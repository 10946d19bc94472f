//! Now-playing status for external observers.
//!
//! The player writes a [`PresenceData`] snapshot through a [`PresenceHandle`]
//! after each transition. Background consumers (the refresh loop and the
//! MPRIS service) only ever read copies of that snapshot.

mod mpris;
mod service;

use std::sync::{Arc, Mutex};

pub use mpris::{ControlCmd, spawn_mpris};
pub use service::PresenceService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceState {
    #[default]
    Idle,
    Browsing,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceData {
    pub state: PresenceState,
    pub song: String,
    pub artist: String,
    /// Set when the song is played from a named playlist.
    pub playlist: Option<String>,
    pub total_songs: usize,
}

/// The two lines shown by a presence consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub details: String,
    pub state: String,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | {}", self.details, self.state)
    }
}

pub fn render_status(data: &PresenceData) -> Status {
    let source = || match &data.playlist {
        Some(name) if !name.is_empty() => format!("Playlist: {name}"),
        _ => "Browsing osu! collection".to_string(),
    };

    match data.state {
        PresenceState::Playing => Status {
            details: format!("♪ {} - {}", data.artist, data.song),
            state: source(),
        },
        PresenceState::Paused => Status {
            details: format!("⏸ {} - {}", data.artist, data.song),
            state: source(),
        },
        PresenceState::Browsing => Status {
            details: "Exploring music library".to_string(),
            state: format!("Browsing {} songs", data.total_songs),
        },
        PresenceState::Idle => Status {
            details: "Idle".to_string(),
            state: "Ready to listen to osu! beats".to_string(),
        },
    }
}

/// Cheap to clone; all clones share one snapshot.
///
/// Setters never block on anything but the snapshot lock, and a poisoned
/// lock only drops the update.
#[derive(Debug, Clone, Default)]
pub struct PresenceHandle {
    data: Arc<Mutex<PresenceData>>,
}

impl PresenceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PresenceData {
        self.data.lock().map(|d| d.clone()).unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut PresenceData)) {
        if let Ok(mut d) = self.data.lock() {
            f(&mut d);
        }
    }

    pub fn report_playing(&self, song: &str, artist: &str, playlist: Option<&str>) {
        self.report_track(PresenceState::Playing, song, artist, playlist);
    }

    pub fn report_paused(&self, song: &str, artist: &str, playlist: Option<&str>) {
        self.report_track(PresenceState::Paused, song, artist, playlist);
    }

    fn report_track(&self, state: PresenceState, song: &str, artist: &str, playlist: Option<&str>) {
        self.update(|d| {
            d.state = state;
            d.song = song.to_string();
            d.artist = artist.to_string();
            d.playlist = playlist.map(str::to_string);
        });
    }

    pub fn report_browsing(&self, total_songs: usize) {
        self.update(|d| {
            *d = PresenceData {
                state: PresenceState::Browsing,
                total_songs,
                ..PresenceData::default()
            };
        });
    }

    pub fn report_idle(&self) {
        self.update(|d| *d = PresenceData::default());
    }
}
