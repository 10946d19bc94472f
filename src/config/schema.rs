use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::load::default_data_dir;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/osu-listener/config.toml` or
/// `~/.config/osu-listener/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags
/// 2) Environment variables (prefix `OSU_LISTENER__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub audio: AudioSettings,
    pub presence: PresenceSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// osu! `Songs` directory. Defaults to the platform install location.
    pub osu_songs_dir: Option<PathBuf>,
    /// Geometry Dash song cache. Defaults to the platform install location on Windows.
    pub level_cache_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            osu_songs_dir: None,
            level_cache_dir: None,
            extensions: vec!["mp3".into()],
        }
    }
}

impl LibrarySettings {
    pub fn osu_songs_path(&self) -> Option<PathBuf> {
        self.osu_songs_dir.clone().or_else(default_osu_songs_dir)
    }

    pub fn level_cache_path(&self) -> Option<PathBuf> {
        self.level_cache_dir.clone().or_else(default_level_cache_dir)
    }
}

fn local_app_data() -> Option<PathBuf> {
    if cfg!(windows) {
        env::var_os("LOCALAPPDATA")
            .map(PathBuf::from)
            .or_else(|| env::var_os("APPDATA").map(|p| PathBuf::from(p).join("..").join("Local")))
    } else {
        env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
    }
}

fn default_osu_songs_dir() -> Option<PathBuf> {
    local_app_data().map(|d| d.join("osu!").join("Songs"))
}

fn default_level_cache_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        local_app_data().map(|d| d.join("GeometryDash"))
    } else {
        None
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Interval between driver ticks (milliseconds).
    pub tick_ms: u64,
    /// Grace period past the track length before a simulated track counts as finished.
    pub end_tolerance_ms: u64,
    /// Default loop mode; a saved preference wins.
    pub loop_mode: LoopModeSetting,
    /// Whether random order starts enabled.
    pub random: bool,
    /// Default for printing the progress line after commands; a saved preference wins.
    pub show_progress: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            end_tolerance_ms: 1000,
            loop_mode: LoopModeSetting::LoopAll,
            random: false,
            show_progress: false,
        }
    }
}

impl PlaybackSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn end_tolerance(&self) -> Duration {
        Duration::from_millis(self.end_tolerance_ms)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopModeSetting {
    #[serde(
        alias = "loopall",
        alias = "loop_all",
        alias = "loop-all",
        alias = "queue"
    )]
    LoopAll,
    #[serde(
        alias = "loopone",
        alias = "loop_one",
        alias = "loop-one",
        alias = "repeat-one",
        alias = "song"
    )]
    LoopOne,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendSetting {
    /// Use the default output device, falling back to simulation.
    Auto,
    /// Require the default output device.
    Native,
    /// Never open an output device; time playback with the clock alone.
    #[serde(alias = "simulation", alias = "none")]
    Simulated,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub backend: BackendSetting,
    /// Default volume in `0.0..=1.0`; a saved preference wins.
    pub volume: f32,
    /// Fixed length for simulated tracks (seconds). Unset derives it from the track id.
    pub simulated_length_secs: Option<u64>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            backend: BackendSetting::Auto,
            volume: 1.0,
            simulated_length_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PresenceSettings {
    /// Run the background status refresh loop.
    pub enabled: bool,
    /// Seconds between status refreshes.
    pub refresh_secs: u64,
    /// Expose now-playing and transport controls over MPRIS.
    pub mpris: bool,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_secs: 7,
            mpris: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub playlists_file: Option<PathBuf>,
    pub prefs_file: Option<PathBuf>,
}

impl StorageSettings {
    /// Playlist store path, falling back to `playlists.txt` in the data dir
    /// (or the working directory when no data dir can be resolved).
    pub fn playlists_path(&self) -> PathBuf {
        self.playlists_file
            .clone()
            .unwrap_or_else(|| data_file("playlists.txt"))
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.prefs_file
            .clone()
            .unwrap_or_else(|| data_file("settings.txt"))
    }
}

fn data_file(name: &str) -> PathBuf {
    default_data_dir()
        .map(|d| d.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}
