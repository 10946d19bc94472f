use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Outcome of a full catalog scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub tracks: Vec<Track>,
    pub beatmaps: usize,
    pub level_cache: usize,
    /// Level-cache files dropped for missing title/artist tags.
    pub skipped: usize,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Split a beatmap folder name like `123456 Artist - Title` into
/// `(artist, title)`. The numeric set id prefix is mandatory.
fn parse_folder_name(name: &str) -> Option<(String, String)> {
    let rest = name.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == name.len() {
        return None;
    }
    let rest = rest.trim_start();
    if rest.is_empty() {
        return None;
    }

    match rest.split_once(" - ") {
        Some((artist, title)) => Some((artist.to_string(), title.to_string())),
        None => Some((UNKNOWN_ARTIST.to_string(), rest.to_string())),
    }
}

/// Direct children of `dir`, sorted by file name.
fn children(dir: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
}

fn find_audio_file(folder: &Path, settings: &LibrarySettings) -> Option<PathBuf> {
    children(folder)
        .map(|e| e.into_path())
        .find(|p| p.is_file() && is_audio_file(p, settings))
}

fn clean_tag(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Read `(artist, title, duration)` from tags; `None` when either text tag is missing.
fn read_tags(path: &Path) -> Option<(String, String, Option<Duration>)> {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "unreadable tags");
            return None;
        }
    };
    let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;

    let title = tag.title().and_then(|v| clean_tag(&v))?;
    let artist = tag.artist().and_then(|v| clean_tag(&v))?;
    Some((artist, title, duration))
}

fn sort_by_display(tracks: &mut [Track]) {
    tracks.sort_by_key(|t| t.display_name().to_lowercase());
}

/// Scan an osu! `Songs` directory: one track per beatmap set folder.
pub fn scan_beatmaps(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();
    for entry in children(dir).filter(|e| e.file_type().is_dir()) {
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some((artist, title)) = parse_folder_name(name) else {
            debug!(folder = name, "not a beatmap folder");
            continue;
        };
        let Some(path) = find_audio_file(entry.path(), settings) else {
            debug!(folder = name, "beatmap folder without audio");
            continue;
        };

        let track = Track::new(artist, title, path);
        if !tracks.contains(&track) {
            tracks.push(track);
        }
    }

    sort_by_display(&mut tracks);
    tracks
}

/// Scan a level cache folder, keeping files whose tags name both artist and title.
///
/// Returns the tracks and the number of audio files skipped for missing tags.
pub fn scan_level_cache(dir: &Path, settings: &LibrarySettings) -> (Vec<Track>, usize) {
    let mut tracks: Vec<Track> = Vec::new();
    let mut skipped = 0;
    for entry in children(dir) {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        match read_tags(path) {
            Some((artist, title, duration)) => {
                let mut track = Track::new(artist, title, path);
                track.duration = duration;
                if tracks.contains(&track) {
                    skipped += 1;
                } else {
                    tracks.push(track);
                }
            }
            None => skipped += 1,
        }
    }

    sort_by_display(&mut tracks);
    (tracks, skipped)
}

/// Scan both configured roots into one catalog with ids assigned from 1.
pub fn scan(settings: &LibrarySettings) -> ScanReport {
    let mut report = ScanReport::default();

    match settings.osu_songs_path() {
        Some(dir) if dir.is_dir() => {
            let found = scan_beatmaps(&dir, settings);
            report.beatmaps = found.len();
            report.tracks.extend(found);
        }
        Some(dir) => warn!(path = %dir.display(), "osu! Songs folder not found"),
        None => warn!("no osu! Songs folder configured"),
    }

    match settings.level_cache_path() {
        Some(dir) if dir.is_dir() => {
            let (found, skipped) = scan_level_cache(&dir, settings);
            report.skipped = skipped;
            for track in found {
                if report.tracks.contains(&track) {
                    report.skipped += 1;
                    continue;
                }
                report.level_cache += 1;
                report.tracks.push(track);
            }
        }
        Some(dir) => warn!(path = %dir.display(), "level cache folder not found"),
        None => debug!("no level cache folder configured"),
    }

    for (i, track) in report.tracks.iter_mut().enumerate() {
        track.id = i as u32 + 1;
    }

    info!(
        total = report.tracks.len(),
        beatmaps = report.beatmaps,
        level_cache = report.level_cache,
        skipped = report.skipped,
        "scan complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.osu"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn parse_folder_name_splits_artist_and_title() {
        assert_eq!(
            parse_folder_name("123456 Camellia - Exit This Earth's Atomosphere"),
            Some((
                "Camellia".to_string(),
                "Exit This Earth's Atomosphere".to_string()
            ))
        );
        assert_eq!(
            parse_folder_name("42Artist - A - B"),
            Some(("Artist".to_string(), "A - B".to_string()))
        );
    }

    #[test]
    fn parse_folder_name_without_dash_uses_unknown_artist() {
        assert_eq!(
            parse_folder_name("99 Lonely Title"),
            Some((UNKNOWN_ARTIST.to_string(), "Lonely Title".to_string()))
        );
    }

    #[test]
    fn parse_folder_name_requires_numeric_prefix() {
        assert_eq!(parse_folder_name("Artist - Title"), None);
        assert_eq!(parse_folder_name("12345"), None);
        assert_eq!(parse_folder_name("12345   "), None);
    }

    #[test]
    fn scan_beatmaps_picks_audio_and_drops_duplicates() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("1 Beta - Song");
        let b = dir.path().join("2 Alpha - Song");
        let dup = dir.path().join("3 Alpha - Song");
        let empty = dir.path().join("4 Nobody - Nothing");
        let junk = dir.path().join("not a beatmap");
        for d in [&a, &b, &dup, &empty, &junk] {
            fs::create_dir_all(d).unwrap();
        }
        fs::write(a.join("audio.mp3"), b"x").unwrap();
        fs::write(a.join("map.osu"), b"x").unwrap();
        fs::write(b.join("track.MP3"), b"x").unwrap();
        fs::write(dup.join("track.mp3"), b"x").unwrap();
        fs::write(empty.join("bg.jpg"), b"x").unwrap();
        fs::write(junk.join("x.mp3"), b"x").unwrap();

        let tracks = scan_beatmaps(dir.path(), &LibrarySettings::default());
        let names: Vec<String> = tracks.iter().map(Track::display_name).collect();
        assert_eq!(names, vec!["Alpha - Song", "Beta - Song"]);
        assert_eq!(tracks[1].path, a.join("audio.mp3"));
    }

    #[test]
    fn scan_level_cache_skips_files_without_tags() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("123.mp3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("CCLocalLevels.dat"), b"x").unwrap();

        let (tracks, skipped) = scan_level_cache(dir.path(), &LibrarySettings::default());
        assert!(tracks.is_empty());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn scan_assigns_sequential_ids_and_tolerates_missing_roots() {
        let dir = tempdir().unwrap();
        let songs = dir.path().join("Songs");
        fs::create_dir_all(songs.join("10 B - Two")).unwrap();
        fs::create_dir_all(songs.join("11 A - One")).unwrap();
        fs::write(songs.join("10 B - Two").join("a.mp3"), b"x").unwrap();
        fs::write(songs.join("11 A - One").join("a.mp3"), b"x").unwrap();

        let settings = LibrarySettings {
            osu_songs_dir: Some(songs),
            level_cache_dir: Some(dir.path().join("missing")),
            ..LibrarySettings::default()
        };
        let report = scan(&settings);
        assert_eq!(report.beatmaps, 2);
        assert_eq!(report.level_cache, 0);
        let ids: Vec<u32> = report.tracks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(report.tracks[0].title, "One");
    }
}
