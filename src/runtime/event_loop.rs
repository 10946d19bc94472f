use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};

use tracing::{debug, info};

use crate::app::App;
use crate::config::Settings;
use crate::error::Result;
use crate::library;
use crate::presence::ControlCmd;
use crate::ui;

use super::shell::{self, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\n> ")?;
    out.flush()
}

/// Print the rendered success value, or the error as a one-line notice.
fn emit<W: Write, T>(out: &mut W, res: Result<T>, render: impl FnOnce(T) -> String) -> io::Result<()> {
    match res {
        Ok(v) => write!(out, "{}", render(v)),
        Err(e) => writeln!(out, "{}", ui::error_line(&e)),
    }
}

fn on_off(b: bool) -> &'static str {
    if b { "on" } else { "off" }
}

/// Run one shell command against the app.
pub fn execute<W: Write>(
    app: &mut App,
    settings: &Settings,
    cmd: Command,
    out: &mut W,
) -> io::Result<Flow> {
    debug!(?cmd, "command");
    match cmd {
        Command::Help => write!(out, "{}", ui::help_text())?,
        Command::Scan => {
            writeln!(out, "Scanning songs...")?;
            let report = library::scan(&settings.library);
            let (beatmaps, level_cache) = (report.beatmaps, report.level_cache);
            app.set_catalog(report.tracks);
            writeln!(
                out,
                "Found {} songs ({beatmaps} beatmaps, {level_cache} level cache). Queue set to all songs.",
                app.catalog().len()
            )?;
        }
        Command::List => {
            if app.catalog().is_empty() {
                writeln!(out, "No songs found. Try scanning first with 'scan' command.")?;
            } else {
                let all: Vec<usize> = (0..app.catalog().len()).collect();
                write!(out, "{}", ui::song_list(app.catalog(), &all))?;
            }
        }
        Command::Search(query) => {
            let hits = app.search(&query);
            if hits.is_empty() {
                writeln!(out, "No songs found matching: {query}")?;
            } else {
                writeln!(out, "Search results for '{query}':")?;
                write!(out, "{}", ui::song_list(app.catalog(), &hits))?;
            }
        }
        Command::Queue => write!(out, "{}", ui::queue_listing(app.queue()))?,
        Command::All => {
            let n = app.use_all_songs();
            writeln!(out, "Queue set to all songs ({n} songs)")?;
        }
        Command::Play(Some(index)) => emit(out, app.play_index(index), |s| ui::started_text(&s))?,
        Command::Play(None) => emit(out, app.play(), |started| match started {
            Some(s) => ui::started_text(&s),
            None => "Playing.\n".to_string(),
        })?,
        Command::Pause => emit(out, app.pause_resume(), |state| {
            format!("{}\n", ui::state_text(state))
        })?,
        Command::Resume => emit(out, app.resume(), |()| "Resumed.\n".to_string())?,
        Command::Stop => {
            app.stop();
            writeln!(out, "Stopped.")?;
        }
        Command::Next => emit(out, app.next(), |s| ui::started_text(&s))?,
        Command::Prev => emit(out, app.prev(), |s| ui::started_text(&s))?,
        Command::Volume(percent) => {
            let v = app.set_volume(percent.min(100) as f32 / 100.0);
            writeln!(out, "Volume set to {}%", (v * 100.0).round() as u32)?;
        }
        Command::Current => write!(out, "{}", ui::current_info(app))?,
        Command::Random => {
            let on = app.toggle_random();
            writeln!(out, "Random order: {}", on_off(on))?;
        }
        Command::Loop => {
            let mode = app.toggle_loop();
            writeln!(out, "Loop mode: {}", ui::loop_mode_text(mode))?;
        }
        Command::Progress => {
            let on = app.toggle_progress();
            writeln!(out, "Progress display: {}", on_off(on))?;
        }
        Command::Playlists => write!(out, "{}", ui::playlists_listing(app.playlists()))?,
        Command::Create(name) => emit(out, app.create_playlist(&name), |()| {
            format!("Created playlist: {name}\n")
        })?,
        Command::Delete(name) => emit(out, app.delete_playlist(&name), |_| {
            format!("Deleted playlist: {name}\n")
        })?,
        Command::Show(name) => emit(out, app.playlist(&name), ui::playlist_contents)?,
        Command::Add { playlist, index } => emit(out, app.add_to_playlist(&playlist, index), |t| {
            format!("Added '{}' to playlist '{playlist}'\n", t.display_name())
        })?,
        Command::Remove { playlist, index } => {
            emit(out, app.remove_from_playlist(&playlist, index), |t| {
                format!("Removed '{}' from playlist '{playlist}'\n", t.display_name())
            })?
        }
        Command::PlayPlaylist(name) => {
            let res = app.play_playlist(&name);
            let len = app.queue().len();
            emit(out, res, |s| {
                format!(
                    "Queue set to playlist '{name}' ({len} songs)\n{}",
                    ui::started_text(&s)
                )
            })?
        }
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Parse and run one input line, then show progress when enabled.
pub fn handle_line<W: Write>(
    app: &mut App,
    settings: &Settings,
    line: &str,
    out: &mut W,
) -> io::Result<Flow> {
    let cmd = match shell::parse(line) {
        Ok(Some(cmd)) => cmd,
        Ok(None) => return Ok(Flow::Continue),
        Err(e) => {
            writeln!(out, "{}", ui::error_line(&e))?;
            return Ok(Flow::Continue);
        }
    };

    // `current` already includes the progress line.
    let already_shown = matches!(cmd, Command::Current);
    let flow = execute(app, settings, cmd, out)?;
    if flow == Flow::Continue && app.show_progress && !already_shown {
        if let Some(p) = app.progress() {
            writeln!(out, "{}", ui::progress_line(&p))?;
        }
    }
    Ok(flow)
}

/// Media keys and signals.
pub fn handle_control<W: Write>(app: &mut App, cmd: ControlCmd, out: &mut W) -> io::Result<Flow> {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return Ok(Flow::Quit),
        ControlCmd::Play => emit(out, app.play(), |s| {
            s.map(|s| ui::started_text(&s)).unwrap_or_default()
        })?,
        ControlCmd::Pause => emit(out, app.pause(), |()| "Paused.\n".to_string())?,
        ControlCmd::PlayPause => emit(out, app.pause_resume(), |state| {
            format!("{}\n", ui::state_text(state))
        })?,
        ControlCmd::Stop => {
            app.stop();
            writeln!(out, "Stopped.")?;
        }
        ControlCmd::Next => emit(out, app.next(), |s| ui::started_text(&s))?,
        ControlCmd::Prev => emit(out, app.prev(), |s| ui::started_text(&s))?,
    }
    Ok(Flow::Continue)
}

/// Main loop: control commands first, then a driver tick, then wait up to one
/// tick interval for a shell line. Returns when the user quits, a signal
/// arrives or stdin closes.
pub fn run(
    app: &mut App,
    settings: &Settings,
    input_rx: &Receiver<String>,
    control_rx: &Receiver<ControlCmd>,
) -> io::Result<()> {
    let tick = settings.playback.tick_interval();
    let mut out = io::stdout();
    prompt(&mut out)?;

    loop {
        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control(app, cmd, &mut out)? == Flow::Quit {
                writeln!(out)?;
                return Ok(());
            }
        }

        if let Some(adv) = app.tick() {
            write!(out, "\n{}", ui::auto_advance_text(&adv))?;
            if app.show_progress {
                if let Some(p) = app.progress() {
                    writeln!(out, "{}", ui::progress_line(&p))?;
                }
            }
            prompt(&mut out)?;
        }

        match input_rx.recv_timeout(tick) {
            Ok(line) => {
                if handle_line(app, settings, &line, &mut out)? == Flow::Quit {
                    return Ok(());
                }
                prompt(&mut out)?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                info!("stdin closed");
                return Ok(());
            }
        }
    }
}
