use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{AudioPlayer, SimulatedLength, SystemClock, select_backend};
use crate::config::{Prefs, Settings};
use crate::library;
use crate::playlist;
use crate::presence::{self, ControlCmd, PresenceHandle, PresenceService};

mod event_loop;
mod input;
mod settings;
mod shell;


#[derive(Parser, Debug)]
#[command(name = "osu-listener")]
#[command(about = "Play songs from your osu! beatmaps and Geometry Dash level cache")]
#[command(version)]
pub struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/osu-listener/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// osu! Songs directory
    #[arg(long)]
    osu_dir: Option<PathBuf>,

    /// Geometry Dash song cache directory
    #[arg(long)]
    level_dir: Option<PathBuf>,

    /// Time playback with the clock alone instead of opening an audio device
    #[arg(long)]
    simulate: bool,
}

fn simulated_length(settings: &Settings) -> SimulatedLength {
    match settings.audio.simulated_length_secs {
        Some(secs) => SimulatedLength::Fixed(Duration::from_secs(secs)),
        None => SimulatedLength::ById,
    }
}

/// Write playlists and preferences; failures are reported but never fatal.
fn save_state(app: &App, settings: &Settings) {
    let playlists_path = settings.storage.playlists_path();
    match playlist::save(&playlists_path, app.playlists()) {
        Ok(()) => println!("Playlists saved to {}", playlists_path.display()),
        Err(e) => warn!(error = %e, "could not save playlists"),
    }
    if let Err(e) = app.prefs().save(&settings.storage.prefs_path()) {
        warn!(error = %e, "could not save preferences");
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = settings::load_settings(&args);

    let backend = select_backend(settings.audio.backend, simulated_length(&settings))?;
    let engine = AudioPlayer::new(
        backend,
        Rc::new(SystemClock),
        settings.playback.end_tolerance(),
    );
    if engine.backend_name() == "simulated" {
        println!("Audio output not available: playback will be simulated.");
    }

    let presence_handle = PresenceHandle::new();
    let mut app = App::new(engine, presence_handle.clone());

    let prefs = Prefs::load(&settings.storage.prefs_path(), Prefs::from_settings(&settings))
        .unwrap_or_else(|e| {
            warn!(error = %e, "could not read preferences, using defaults");
            Prefs::from_settings(&settings)
        });
    app.apply_prefs(&prefs);

    println!("Scanning songs...");
    let report = library::scan(&settings.library);
    println!(
        "Found {} songs ({} beatmaps, {} level cache).",
        report.tracks.len(),
        report.beatmaps,
        report.level_cache
    );
    app.set_catalog(report.tracks);
    if settings.playback.random {
        app.toggle_random();
    }

    match playlist::load(&settings.storage.playlists_path()) {
        Ok(registry) => app.set_playlists(registry),
        Err(e) => warn!(error = %e, "could not load playlists"),
    }

    let mut presence_service = settings.presence.enabled.then(|| {
        PresenceService::spawn(
            presence_handle.clone(),
            Duration::from_secs(settings.presence.refresh_secs),
            |status| println!("\n[status] {status}"),
        )
    });

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    if settings.presence.mpris {
        presence::spawn_mpris(control_tx.clone(), presence_handle.clone());
    }
    input::spawn_signal_listener(control_tx);
    let input_rx = input::spawn_stdin_reader();

    println!("\n=== osu! Music Player ===");
    println!("Type 'help' for available commands");

    let run_result = event_loop::run(&mut app, &settings, &input_rx, &control_rx);

    app.shutdown();
    save_state(&app, &settings);
    if let Some(service) = presence_service.as_mut() {
        service.stop();
    }
    info!("goodbye");
    println!("Goodbye!");

    run_result.map_err(Into::into)
}
