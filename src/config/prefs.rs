//! User preferences persisted between sessions as `key=value` lines.
//!
//! ```text
//! volume=0.8
//! show_progress=1
//! loop_mode=0
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::audio::LoopMode;
use crate::error::StoreError;

use super::schema::{LoopModeSetting, Settings};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prefs {
    pub volume: f32,
    pub show_progress: bool,
    pub loop_mode: LoopMode,
}

impl Prefs {
    /// Defaults taken from the loaded configuration.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            volume: settings.audio.volume,
            show_progress: settings.playback.show_progress,
            loop_mode: match settings.playback.loop_mode {
                LoopModeSetting::LoopAll => LoopMode::LoopAll,
                LoopModeSetting::LoopOne => LoopMode::LoopOne,
            },
        }
    }

    /// Overlay values from `key=value` text. Unknown keys and malformed
    /// values are skipped with a warning.
    pub fn apply(&mut self, text: &str) {
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((key, value)) = line.split_once('=') else {
                warn!(line, "ignoring malformed preference line");
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "volume" => match value.parse::<f32>() {
                    Ok(v) if v.is_finite() => self.volume = v.clamp(0.0, 1.0),
                    _ => warn!(value, "ignoring invalid volume"),
                },
                "show_progress" => match parse_flag(value) {
                    Some(b) => self.show_progress = b,
                    None => warn!(value, "ignoring invalid show_progress"),
                },
                "loop_mode" => match parse_flag(value) {
                    Some(true) => self.loop_mode = LoopMode::LoopOne,
                    Some(false) => self.loop_mode = LoopMode::LoopAll,
                    None => warn!(value, "ignoring invalid loop_mode"),
                },
                other => debug!(key = other, "ignoring unknown preference"),
            }
        }
    }

    pub fn render(&self) -> String {
        format!(
            "volume={}\nshow_progress={}\nloop_mode={}\n",
            self.volume,
            u8::from(self.show_progress),
            u8::from(self.loop_mode == LoopMode::LoopOne),
        )
    }

    /// Read preferences over `defaults`. A missing file is not an error.
    pub fn load(path: &Path, defaults: Prefs) -> Result<Self, StoreError> {
        let mut prefs = defaults;
        match fs::read_to_string(path) {
            Ok(text) => prefs.apply(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved preferences yet");
            }
            Err(e) => return Err(StoreError::io(path, e)),
        }
        Ok(prefs)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(path, self.render()).map_err(|e| StoreError::io(path, e))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
