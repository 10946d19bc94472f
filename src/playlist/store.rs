//! Playlist text file:
//!
//! ```text
//! [PLAYLIST]name
//! artist|title|path
//! [END]
//! ```

use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::error::StoreError;
use crate::library::Track;

use super::PlaylistRegistry;

const START: &str = "[PLAYLIST]";
const END: &str = "[END]";

/// Parse the playlist format. Lines outside a block and lines without
/// three `|`-separated fields are skipped.
pub fn parse(text: &str) -> PlaylistRegistry {
    let mut registry = PlaylistRegistry::new();
    let mut current: Option<String> = None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if let Some(name) = line.strip_prefix(START) {
            if name.is_empty() {
                warn!(line = lineno + 1, "playlist without a name skipped");
                current = None;
                continue;
            }
            // A repeated block appends to the existing playlist.
            let _ = registry.create(name);
            current = Some(name.to_string());
        } else if line == END {
            current = None;
        } else if line.is_empty() {
            continue;
        } else if let Some(name) = current.as_deref() {
            let mut fields = line.splitn(3, '|');
            match (fields.next(), fields.next(), fields.next()) {
                (Some(artist), Some(title), Some(path)) => {
                    let _ = registry.add(name, Track::new(artist, title, path));
                }
                _ => warn!(line = lineno + 1, "malformed playlist entry skipped"),
            }
        } else {
            warn!(line = lineno + 1, "playlist entry outside a block skipped");
        }
    }
    registry
}

pub fn render(registry: &PlaylistRegistry) -> String {
    let mut out = String::new();
    for playlist in registry.iter() {
        out.push_str(START);
        out.push_str(&playlist.name);
        out.push('\n');
        for t in &playlist.tracks {
            out.push_str(&format!("{}|{}|{}\n", t.artist, t.title, t.path.display()));
        }
        out.push_str(END);
        out.push('\n');
    }
    out
}

/// Read playlists from `path`. A missing file is an empty registry.
pub fn load(path: &Path) -> Result<PlaylistRegistry, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let registry = parse(&text);
            info!(path = %path.display(), count = registry.len(), "playlists loaded");
            Ok(registry)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no playlist file yet");
            Ok(PlaylistRegistry::new())
        }
        Err(e) => Err(StoreError::io(path, e)),
    }
}

pub fn save(path: &Path, registry: &PlaylistRegistry) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    fs::write(path, render(registry)).map_err(|e| StoreError::io(path, e))?;
    info!(path = %path.display(), count = registry.len(), "playlists saved");
    Ok(())
}
