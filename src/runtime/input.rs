//! Helper threads that feed the main loop: stdin lines and shutdown signals.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender};

use tokio::signal;
use tracing::{debug, info, warn};

use crate::presence::ControlCmd;

/// Read stdin lines on a helper thread. The receiver disconnects at EOF.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        debug!("stdin reader finished");
    });
    rx
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
    }
}

/// Turn SIGINT/SIGTERM into `ControlCmd::Quit` so shutdown always takes the
/// same path as the `quit` command.
pub fn spawn_signal_listener(tx: Sender<ControlCmd>) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                warn!(error = %e, "signal handling unavailable");
                return;
            }
        };
        rt.block_on(shutdown_signal());
        let _ = tx.send(ControlCmd::Quit);
    });
}
