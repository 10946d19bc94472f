use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::*;
use crate::error::PlayerError;
use crate::library::Track;

const TOLERANCE: Duration = Duration::from_millis(1000);

fn track(id: u32) -> Track {
    let mut t = Track::new("Artist", format!("Song {id}"), format!("/tmp/{id}.mp3"));
    t.id = id;
    t
}

fn clock_pair() -> (ManualClock, PositionClock) {
    let manual = ManualClock::new();
    let clock = PositionClock::new(Rc::new(manual.clone()));
    (manual, clock)
}

fn simulated_player(length: Duration) -> (ManualClock, AudioPlayer) {
    let manual = ManualClock::new();
    let backend = SimulatedBackend::new(SimulatedLength::Fixed(length));
    let player = AudioPlayer::new(Box::new(backend), Rc::new(manual.clone()), TOLERANCE);
    (manual, player)
}

/// Backend whose output activity and load failures are driven by the test.
#[derive(Clone, Default)]
struct ScriptedBackend {
    active: Rc<Cell<bool>>,
    fail_loads: Rc<Cell<bool>>,
    calls: Rc<RefCell<Vec<&'static str>>>,
}

impl Backend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn reports_completion(&self) -> bool {
        true
    }

    fn load(&mut self, _track: &Track) -> Result<LoadedSound, BackendError> {
        self.calls.borrow_mut().push("load");
        if self.fail_loads.get() {
            return Err(BackendError::Decode("unsupported format".into()));
        }
        Ok(LoadedSound {
            handle: SoundHandle(1),
            length: Duration::from_secs(120),
        })
    }

    fn play(&mut self, _handle: SoundHandle) {
        self.calls.borrow_mut().push("play");
        self.active.set(true);
    }

    fn pause(&mut self, _handle: SoundHandle) {
        self.calls.borrow_mut().push("pause");
    }

    fn resume(&mut self, _handle: SoundHandle) {
        self.calls.borrow_mut().push("resume");
    }

    fn stop(&mut self, _handle: SoundHandle) {
        self.calls.borrow_mut().push("stop");
        self.active.set(false);
    }

    fn is_active(&self, _handle: SoundHandle) -> bool {
        self.active.get()
    }

    fn set_volume(&mut self, _volume: f32) {}
}

#[test]
fn clock_reads_zero_before_start() {
    let (manual, clock) = clock_pair();
    manual.advance_ms(5000);
    assert_eq!(clock.elapsed(), Duration::ZERO);
    assert_eq!(clock.remaining(), Duration::ZERO);
}

#[test]
fn clock_excludes_every_paused_interval() {
    let (manual, mut clock) = clock_pair();
    clock.start(Duration::from_secs(60));

    manual.advance_ms(2000);
    clock.mark_pause_start();
    manual.advance_ms(10_000);
    assert_eq!(clock.elapsed(), Duration::from_millis(2000));
    clock.mark_resume();

    manual.advance_ms(1500);
    clock.mark_pause_start();
    manual.advance_ms(4000);
    clock.mark_resume();

    manual.advance_ms(500);
    assert_eq!(clock.elapsed(), Duration::from_millis(4000));
    assert_eq!(clock.remaining(), Duration::from_millis(56_000));
}

#[test]
fn clock_elapsed_is_non_decreasing_while_playing() {
    let (manual, mut clock) = clock_pair();
    clock.start(Duration::from_secs(10));

    let mut last = clock.elapsed();
    for step in [0, 1, 7, 33, 250, 1000, 0, 4000] {
        manual.advance_ms(step);
        let now = clock.elapsed();
        assert!(now >= last, "{now:?} < {last:?}");
        last = now;
    }
}

#[test]
fn clock_remaining_saturates_and_is_zero_for_unknown_length() {
    let (manual, mut clock) = clock_pair();
    clock.start(Duration::from_secs(1));
    manual.advance_ms(3000);
    assert_eq!(clock.remaining(), Duration::ZERO);

    clock.start(Duration::ZERO);
    assert_eq!(clock.remaining(), Duration::ZERO);
}

#[test]
fn clock_reaches_end_only_after_length_plus_tolerance() {
    for tolerance_ms in [0u64, 1, 250, 1000] {
        let tolerance = Duration::from_millis(tolerance_ms);
        let (manual, mut clock) = clock_pair();
        clock.start(Duration::from_secs(3));

        manual.advance_ms(2999);
        assert!(!clock.has_reached_end(tolerance));

        manual.advance_ms(1 + tolerance_ms);
        assert!(clock.has_reached_end(tolerance));
    }
}

#[test]
fn clock_start_discards_previous_session() {
    let (manual, mut clock) = clock_pair();
    clock.start(Duration::from_secs(30));
    manual.advance_ms(9000);
    clock.mark_pause_start();

    clock.start(Duration::from_secs(45));
    assert!(!clock.is_paused());
    assert_eq!(clock.elapsed(), Duration::ZERO);
    assert_eq!(clock.length(), Duration::from_secs(45));
}

#[test]
fn simulated_length_by_id_spans_thirty_to_ninety_seconds() {
    let lengths: Vec<u64> = (0..5)
        .map(|id| SimulatedLength::ById.length_for(&track(id)).as_secs())
        .collect();
    assert_eq!(lengths, vec![30, 45, 60, 75, 90]);
    assert_eq!(SimulatedLength::ById.length_for(&track(7)).as_secs(), 60);
}

#[test]
fn play_without_a_loaded_track_reports_nothing_to_play() {
    let (_manual, mut player) = simulated_player(Duration::from_secs(10));
    assert!(matches!(player.play(), Err(PlayerError::NothingToPlay)));
    assert_eq!(player.state(), PlaybackState::Stopped);
}

#[test]
fn load_does_not_start_playback() {
    let (manual, mut player) = simulated_player(Duration::from_secs(10));
    let length = player.load(&track(1)).unwrap();
    assert_eq!(length, Duration::from_secs(10));
    assert_eq!(player.state(), PlaybackState::Stopped);

    manual.advance_ms(60_000);
    player.tick();
    assert!(!player.finished_naturally());
    assert_eq!(player.elapsed(), Duration::ZERO);
}

#[test]
fn pause_and_resume_only_apply_in_matching_states() {
    let (manual, mut player) = simulated_player(Duration::from_secs(10));
    assert!(!player.pause());
    assert!(!player.resume());

    player.load(&track(1)).unwrap();
    player.play().unwrap();
    assert!(!player.resume());
    assert!(player.pause());
    assert!(!player.pause());
    assert_eq!(player.state(), PlaybackState::Paused);

    manual.advance_ms(500);
    assert!(player.resume());
    assert_eq!(player.state(), PlaybackState::Playing);
}

#[test]
fn pause_for_three_seconds_does_not_count_toward_elapsed() {
    let (manual, mut player) = simulated_player(Duration::from_secs(60));
    player.load(&track(1)).unwrap();
    player.play().unwrap();

    manual.advance_ms(5000);
    assert!(player.pause());
    manual.advance_ms(3000);
    assert!(player.resume());

    assert_eq!(player.elapsed(), Duration::from_millis(5000));
}

#[test]
fn play_while_paused_resumes_instead_of_restarting() {
    let (manual, mut player) = simulated_player(Duration::from_secs(60));
    player.load(&track(1)).unwrap();
    player.play().unwrap();
    manual.advance_ms(4000);
    player.pause();
    manual.advance_ms(1000);

    player.play().unwrap();
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.elapsed(), Duration::from_millis(4000));
}

#[test]
fn simulated_tick_finishes_after_length_plus_tolerance() {
    let (manual, mut player) = simulated_player(Duration::from_secs(30));
    player.load(&track(1)).unwrap();
    player.play().unwrap();

    manual.advance_ms(30_000);
    player.tick();
    assert_eq!(player.state(), PlaybackState::Playing);
    assert!(!player.finished_naturally());

    manual.advance_ms(1000);
    player.tick();
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert!(player.finished_naturally());
    assert!(player.take_finished());
    assert!(!player.finished_naturally());
}

#[test]
fn paused_track_never_finishes() {
    let (manual, mut player) = simulated_player(Duration::from_secs(1));
    player.load(&track(1)).unwrap();
    player.play().unwrap();
    player.pause();

    manual.advance_ms(600_000);
    player.tick();
    assert_eq!(player.state(), PlaybackState::Paused);
    assert!(!player.finished_naturally());
}

#[test]
fn zero_length_simulated_track_finishes_after_tolerance() {
    let (manual, mut player) = simulated_player(Duration::ZERO);
    player.load(&track(1)).unwrap();
    player.play().unwrap();

    manual.advance_ms(999);
    player.tick();
    assert_eq!(player.state(), PlaybackState::Playing);

    manual.advance_ms(1);
    player.tick();
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert!(player.take_finished());
}

#[test]
fn manual_stop_never_sets_the_finish_flag() {
    let (manual, mut player) = simulated_player(Duration::from_secs(2));
    player.load(&track(1)).unwrap();
    player.play().unwrap();
    manual.advance_ms(10_000);

    player.stop();
    player.tick();
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert!(!player.finished_naturally());
}

#[test]
fn play_after_stop_restarts_from_the_top() {
    let (manual, mut player) = simulated_player(Duration::from_secs(60));
    player.load(&track(1)).unwrap();
    player.play().unwrap();
    manual.advance_ms(20_000);
    player.stop();

    player.play().unwrap();
    manual.advance_ms(1000);
    assert_eq!(player.elapsed(), Duration::from_millis(1000));
}

#[test]
fn backend_driven_tick_uses_channel_activity() {
    let backend = ScriptedBackend::default();
    let active = backend.active.clone();
    let manual = ManualClock::new();
    let mut player = AudioPlayer::new(Box::new(backend), Rc::new(manual.clone()), TOLERANCE);

    player.load(&track(1)).unwrap();
    player.play().unwrap();
    player.tick();
    assert_eq!(player.state(), PlaybackState::Playing);

    // The clock alone says "not done"; the backend says the channel ended.
    active.set(false);
    player.tick();
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert!(player.finished_naturally());
}

#[test]
fn failed_load_leaves_player_stopped_with_nothing_loaded() {
    let backend = ScriptedBackend::default();
    let fail = backend.fail_loads.clone();
    let mut player = AudioPlayer::new(
        Box::new(backend),
        Rc::new(ManualClock::new()),
        TOLERANCE,
    );

    player.load(&track(1)).unwrap();
    player.play().unwrap();

    fail.set(true);
    let err = player.load(&track(2)).unwrap_err();
    assert!(matches!(err, PlayerError::LoadFailure { .. }));
    assert_eq!(player.state(), PlaybackState::Stopped);
    assert!(player.current_track().is_none());
    assert!(!player.finished_naturally());
    assert!(matches!(player.play(), Err(PlayerError::NothingToPlay)));
}

#[test]
fn load_stops_the_previous_sound_first() {
    let backend = ScriptedBackend::default();
    let calls = backend.calls.clone();
    let mut player = AudioPlayer::new(
        Box::new(backend),
        Rc::new(ManualClock::new()),
        TOLERANCE,
    );

    player.load(&track(1)).unwrap();
    player.play().unwrap();
    player.load(&track(2)).unwrap();

    assert_eq!(*calls.borrow(), vec!["load", "play", "stop", "load"]);
}

#[test]
fn volume_is_clamped() {
    let (_manual, mut player) = simulated_player(Duration::from_secs(1));
    assert_eq!(player.set_volume(1.7), 1.0);
    assert_eq!(player.set_volume(-0.2), 0.0);
    assert_eq!(player.set_volume(0.35), 0.35);
    assert_eq!(player.set_volume(f32::NAN), 0.35);
}

#[test]
fn simulated_backend_tracks_active_handle() {
    let mut backend = SimulatedBackend::new(SimulatedLength::ById);
    let a = backend.load(&track(1)).unwrap();
    let b = backend.load(&track(2)).unwrap();
    assert_ne!(a.handle, b.handle);

    backend.play(b.handle);
    assert!(backend.is_active(b.handle));
    assert!(!backend.is_active(a.handle));
    backend.stop(b.handle);
    assert!(!backend.is_active(b.handle));

    backend.set_volume(0.5);
    assert_eq!(backend.volume(), 0.5);
}

#[test]
fn loop_mode_toggles_between_queue_and_song() {
    assert_eq!(LoopMode::default(), LoopMode::LoopAll);
    assert_eq!(LoopMode::LoopAll.toggled(), LoopMode::LoopOne);
    assert_eq!(LoopMode::LoopOne.toggled(), LoopMode::LoopAll);
}
