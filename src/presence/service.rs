use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info};

use super::{PresenceHandle, Status, render_status};

/// Periodic refresh loop: renders the latest snapshot and hands it to the
/// reporter only when the rendered status changed.
///
/// Dropping the service stops the loop and joins the thread.
pub struct PresenceService {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl PresenceService {
    pub fn spawn<F>(handle: PresenceHandle, interval: Duration, mut report: F) -> Self
    where
        F: FnMut(&Status) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = std::thread::spawn(move || {
            info!(every = ?interval, "presence refresh loop started");
            let mut last: Option<Status> = None;

            let mut apply = |last: &mut Option<Status>| {
                let status = render_status(&handle.snapshot());
                if last.as_ref() != Some(&status) {
                    info!(%status, "presence changed");
                    report(&status);
                    *last = Some(status);
                }
            };

            loop {
                apply(&mut last);
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            // Publish whatever was reported during shutdown.
            apply(&mut last);
            debug!("presence refresh loop stopped");
        });

        Self {
            stop: Some(stop_tx),
            thread: Some(thread),
        }
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for PresenceService {
    fn drop(&mut self) {
        self.stop();
    }
}
