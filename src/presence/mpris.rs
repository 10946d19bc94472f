//! MPRIS D-Bus service: publishes the presence snapshot and forwards media
//! keys to the main loop.

use std::collections::HashMap;
use std::sync::mpsc::Sender;

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use super::{PresenceHandle, PresenceState};

/// Requests that reach the main loop from outside the shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.osu_listener";

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "osu!listener"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    presence: PresenceHandle,
}

pub(super) fn playback_status(state: PresenceState) -> &'static str {
    match state {
        PresenceState::Playing => "Playing",
        PresenceState::Paused => "Paused",
        PresenceState::Idle | PresenceState::Browsing => "Stopped",
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        playback_status(self.presence.snapshot().state)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let data = self.presence.snapshot();
        let mut map = HashMap::new();
        if matches!(data.state, PresenceState::Playing | PresenceState::Paused) {
            if let Ok(v) = OwnedValue::try_from(Value::from(data.song)) {
                map.insert("xesam:title".to_string(), v);
            }
            if let Ok(v) = OwnedValue::try_from(Value::from(vec![data.artist])) {
                map.insert("xesam:artist".to_string(), v);
            }
        }
        map
    }
}

/// Serve MPRIS on the session bus from a detached thread.
///
/// Failure to reach the bus is logged and the player carries on without it.
pub fn spawn_mpris(tx: Sender<ControlCmd>, presence: PresenceHandle) {
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "mpris: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "mpris: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "mpris: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(OBJECT_PATH, PlayerIface { tx, presence })
                .await
            {
                warn!(error = %e, "mpris: failed to register player iface");
                return;
            }
            info!(name = BUS_NAME, "mpris service registered");

            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });
}
