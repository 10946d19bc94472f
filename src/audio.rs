//! Audio subsystem: backends, the position clock and the playback state machine.

mod backend;
mod clock;
mod player;
mod sink;
mod types;

pub use backend::{Backend, BackendError, SimulatedBackend, SimulatedLength, select_backend};
pub use clock::{Clock, PositionClock, SystemClock};
pub use player::AudioPlayer;
pub use types::{LoadedSound, LoopMode, PlaybackState, SoundHandle};

#[cfg(test)]
pub(crate) use clock::ManualClock;

#[cfg(test)]
mod tests;
