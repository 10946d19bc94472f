//! Text rendering for the command shell.
//!
//! Every function builds a `String`; the runtime decides where it goes.
//! Colors come from `crossterm` and are kept to headers, markers and errors.

use std::fmt::{Display, Write as _};
use std::sync::LazyLock;
use std::time::Duration;

use crossterm::style::Stylize;

use crate::app::{App, AutoAdvance, Progress, Started};
use crate::audio::{LoopMode, PlaybackState};
use crate::library::Track;
use crate::playlist::{Playlist, PlaylistRegistry};
use crate::queue::Queue;

static HELP_SECTIONS: LazyLock<Vec<(&'static str, Vec<(&'static str, &'static str)>)>> =
    LazyLock::new(|| {
        vec![
            (
                "General",
                vec![
                    ("help", "Show this menu"),
                    ("scan", "Rescan song directories"),
                    ("list", "Show all songs"),
                    ("search <query>", "Search for songs"),
                    ("queue", "Show current queue"),
                    ("all", "Queue all songs"),
                ],
            ),
            (
                "Playback",
                vec![
                    ("play <number>", "Play song by queue index"),
                    ("play", "Resume/play current song"),
                    ("pause", "Pause or resume playback"),
                    ("resume", "Resume playback"),
                    ("stop", "Stop playback"),
                    ("next", "Next song"),
                    ("prev", "Previous song"),
                    ("vol <0-100>", "Set volume"),
                    ("current", "Show current song info"),
                    ("random", "Toggle random order"),
                    ("loop", "Toggle loop queue / loop song"),
                    ("progress", "Toggle progress display"),
                ],
            ),
            (
                "Playlists",
                vec![
                    ("playlists", "Show all playlists"),
                    ("create <name>", "Create new playlist"),
                    ("delete <name>", "Delete playlist"),
                    ("show <name>", "Show playlist contents"),
                    ("add <playlist> <song#>", "Add song from 'list' to playlist"),
                    ("remove <playlist> <song#>", "Remove song from playlist"),
                    ("playlist <name>", "Play entire playlist"),
                ],
            ),
            ("Other", vec![("quit/exit", "Exit program")]),
        ]
    });

pub fn help_text() -> String {
    let mut out = format!("{}\n", "=== Available Commands ===".bold());
    for (section, commands) in HELP_SECTIONS.iter() {
        let _ = writeln!(out, "{section}:");
        for (cmd, what) in commands {
            let _ = writeln!(out, "  {cmd} - {what}");
        }
    }
    out
}

/// Format a `Duration` as `m:ss`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn progress_line(p: &Progress) -> String {
    format!(
        "{} / {} (Remaining: {})",
        format_mmss(p.elapsed),
        format_mmss(p.length),
        format_mmss(p.remaining)
    )
}

pub fn error_line(e: &dyn Display) -> String {
    format!("{}", e.to_string().red())
}

fn numbered<'a>(out: &mut String, rows: impl Iterator<Item = (usize, &'a Track, bool)>) {
    for (i, track, current) in rows {
        let marker = if current { " -> " } else { "    " };
        let _ = writeln!(out, "{marker}{}. {}", i + 1, track.display_name());
    }
}

/// Songs at `indices` of `tracks`, numbered by their catalog position.
pub fn song_list(tracks: &[Track], indices: &[usize]) -> String {
    if indices.is_empty() {
        return "No songs to display.\n".to_string();
    }
    let mut out = format!("Songs ({} total):\n", indices.len());
    out.push_str(&"=".repeat(32));
    out.push('\n');
    numbered(
        &mut out,
        indices
            .iter()
            .filter_map(|&i| tracks.get(i).map(|t| (i, t, false))),
    );
    out
}

pub fn queue_listing(queue: &Queue) -> String {
    if queue.is_empty() {
        return "Queue is empty.\n".to_string();
    }
    let mut out = String::from("Current Queue");
    if let Some(name) = queue.playlist_name() {
        let _ = write!(out, " (Playlist: {name})");
    }
    if queue.is_random() {
        out.push_str(" [random]");
    }
    out.push_str(":\n");
    out.push_str(&"=".repeat(43));
    out.push('\n');
    let current = queue.current_index();
    numbered(
        &mut out,
        queue
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t, Some(i) == current)),
    );
    out
}

pub fn playlists_listing(registry: &PlaylistRegistry) -> String {
    if registry.is_empty() {
        return "No playlists created yet.\n".to_string();
    }
    let mut out = String::from("Available Playlists:\n===================\n");
    for p in registry.iter() {
        let _ = writeln!(out, "- {} ({} songs)", p.name, p.len());
    }
    out
}

pub fn playlist_contents(playlist: &Playlist) -> String {
    if playlist.is_empty() {
        return format!("Playlist '{}' is empty.\n", playlist.name);
    }
    let mut out = format!("Playlist: {} ({} songs)\n", playlist.name, playlist.len());
    out.push_str(&"-".repeat(40));
    out.push('\n');
    numbered(
        &mut out,
        playlist.tracks.iter().enumerate().map(|(i, t)| (i, t, false)),
    );
    out
}

pub fn loop_mode_text(mode: LoopMode) -> &'static str {
    match mode {
        LoopMode::LoopAll => "Loop queue",
        LoopMode::LoopOne => "Loop current song",
    }
}

pub fn current_info(app: &App) -> String {
    let Some(track) = app.engine().current_track() else {
        return "No song selected.\n".to_string();
    };
    let mut out = format!("Current song: {}\n", track.display_name().bold());
    let _ = writeln!(
        out,
        "State: {} | Volume: {}% | {} | Random: {}",
        app.state().label(),
        (app.engine().volume() * 100.0).round() as u32,
        loop_mode_text(app.loop_mode),
        if app.queue().is_random() { "on" } else { "off" }
    );
    if let Some(p) = app.progress() {
        let _ = writeln!(out, "{}", progress_line(&p));
    }
    if let Some(name) = app.queue().playlist_name() {
        let _ = writeln!(out, "Playing from playlist: {name}");
    }
    out
}

pub fn started_text(s: &Started) -> String {
    let mut out = String::new();
    if s.reshuffled {
        out.push_str("Played every song, reshuffling.\n");
    } else if s.wrapped {
        out.push_str("Reached end of queue, looping around.\n");
    }
    let _ = writeln!(out, "{} {}", "Now playing:".green(), s.track.display_name());
    out
}

pub fn auto_advance_text(adv: &AutoAdvance) -> String {
    match adv {
        AutoAdvance::Replayed(s) => {
            format!("Song finished, replaying: {}\n", s.track.display_name())
        }
        AutoAdvance::Advanced(s) => format!("Song finished.\n{}", started_text(s)),
        AutoAdvance::Halted(e) => format!("Song finished. {}\n", error_line(e)),
    }
}

pub fn state_text(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "Resumed.",
        PlaybackState::Paused => "Paused.",
        PlaybackState::Stopped => "Stopped.",
    }
}
