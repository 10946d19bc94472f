//! Application module: the `App` driver that owns the catalog, playlists,
//! queue and playback engine.
//!
//! The runtime calls `App::tick` on every loop iteration and the transport
//! methods in response to shell commands and media keys.

mod model;

pub use model::*;
