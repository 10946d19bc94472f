//! Native output through `rodio`.
//!
//! Each loaded track gets its own paused `Sink`; only one is kept alive, so
//! loading a new track drops the previous sink.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::library::Track;

use super::backend::{Backend, BackendError};
use super::types::{LoadedSound, SoundHandle};

/// Open and decode `track` into a paused `Sink`, returning it with the decoded length.
fn create_paused_sink(stream: &OutputStream, track: &Track) -> Result<(Sink, Duration), BackendError> {
    let file = File::open(&track.path)?;
    let source =
        Decoder::new(BufReader::new(file)).map_err(|e| BackendError::Decode(e.to_string()))?;

    // Decoders for some formats cannot tell their length up front; the
    // tag-derived length from the scanner is the fallback.
    let length = source
        .total_duration()
        .or(track.duration)
        .unwrap_or(Duration::ZERO);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, length))
}

pub struct RodioBackend {
    stream: OutputStream,
    current: Option<(SoundHandle, Sink)>,
    next_handle: u64,
    volume: f32,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open() -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land in the shell.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            current: None,
            next_handle: 0,
            volume: 1.0,
        })
    }

    fn sink(&self, handle: SoundHandle) -> Option<&Sink> {
        self.current
            .as_ref()
            .filter(|(h, _)| *h == handle)
            .map(|(_, s)| s)
    }
}

impl Backend for RodioBackend {
    fn name(&self) -> &'static str {
        "rodio"
    }

    fn reports_completion(&self) -> bool {
        true
    }

    fn load(&mut self, track: &Track) -> Result<LoadedSound, BackendError> {
        let (sink, length) = create_paused_sink(&self.stream, track)?;
        sink.set_volume(self.volume);

        if let Some((_, old)) = self.current.take() {
            old.stop();
        }

        self.next_handle += 1;
        let handle = SoundHandle(self.next_handle);
        self.current = Some((handle, sink));
        debug!(track = %track.display_name(), ?length, "decoded");
        Ok(LoadedSound { handle, length })
    }

    fn play(&mut self, handle: SoundHandle) {
        if let Some(s) = self.sink(handle) {
            s.play();
        }
    }

    fn pause(&mut self, handle: SoundHandle) {
        if let Some(s) = self.sink(handle) {
            s.pause();
        }
    }

    fn resume(&mut self, handle: SoundHandle) {
        self.play(handle);
    }

    fn stop(&mut self, handle: SoundHandle) {
        if self.sink(handle).is_some() {
            if let Some((_, s)) = self.current.take() {
                s.stop();
            }
        }
    }

    fn is_active(&self, handle: SoundHandle) -> bool {
        self.sink(handle).is_some_and(|s| !s.empty())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some((_, s)) = self.current.as_ref() {
            s.set_volume(volume);
        }
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        if let Some((_, s)) = self.current.take() {
            s.stop();
        }
    }
}
