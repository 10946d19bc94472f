//! Wall-clock playback position tracking.
//!
//! [`PositionClock`] derives elapsed and remaining time from a monotonic
//! clock instead of asking the backend, so it works the same with a real
//! output device and in simulation.
//!
//! Elapsed time is
//! `now - started - paused_total - (now - paused_at if paused)`, saturating
//! at zero. While playing it never decreases.

use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The process monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct PositionClock {
    clock: Rc<dyn Clock>,
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
    length: Duration,
}

impl PositionClock {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            started_at: None,
            paused_at: None,
            paused_total: Duration::ZERO,
            length: Duration::ZERO,
        }
    }

    /// Begin a fresh play session for a track of `length`.
    ///
    /// Overwrites any previous session; call once per load or replay.
    pub fn start(&mut self, length: Duration) {
        self.started_at = Some(self.clock.now());
        self.paused_at = None;
        self.paused_total = Duration::ZERO;
        self.length = length;
    }

    /// Forget the current session. Elapsed reads as zero until the next `start`.
    pub fn reset(&mut self, length: Duration) {
        self.started_at = None;
        self.paused_at = None;
        self.paused_total = Duration::ZERO;
        self.length = length;
    }

    /// Record the start of a pause. The engine only calls this on Playing -> Paused.
    pub fn mark_pause_start(&mut self) {
        self.paused_at = Some(self.clock.now());
    }

    /// Fold the pause that began at `mark_pause_start` into the paused total.
    pub fn mark_resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += self.clock.now().saturating_duration_since(paused_at);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn elapsed(&self) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let now = self.clock.now();
        let current_pause = self
            .paused_at
            .map_or(Duration::ZERO, |p| now.saturating_duration_since(p));

        now.saturating_duration_since(started_at)
            .saturating_sub(self.paused_total)
            .saturating_sub(current_pause)
    }

    /// Time left in the track; zero when the length is unknown.
    pub fn remaining(&self) -> Duration {
        if self.length.is_zero() {
            return Duration::ZERO;
        }
        self.length.saturating_sub(self.elapsed())
    }

    /// True once elapsed time reaches `length + tolerance`.
    pub fn has_reached_end(&self, tolerance: Duration) -> bool {
        self.elapsed() >= self.length + tolerance
    }
}

/// Hand-driven clock for tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<Instant>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: std::rc::Rc::new(std::cell::Cell::new(Instant::now())),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub(crate) fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
