use tracing::{info, warn};

use crate::config;

use super::Args;

/// Load settings, falling back to defaults on any error, then apply
/// command-line overrides.
pub fn load_settings(args: &Args) -> config::Settings {
    let mut settings = match config::Settings::load(args.config.as_deref()) {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!(%msg, "invalid config, using defaults");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warn!(error = %e, "failed to load config, using defaults");
            config::Settings::default()
        }
    };
    apply_args(&mut settings, args);
    settings
}

fn apply_args(settings: &mut config::Settings, args: &Args) {
    if let Some(dir) = &args.osu_dir {
        settings.library.osu_songs_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.level_dir {
        settings.library.level_cache_dir = Some(dir.clone());
    }
    if args.simulate {
        settings.audio.backend = config::BackendSetting::Simulated;
    }
    info!(
        osu = ?settings.library.osu_songs_path(),
        level_cache = ?settings.library.level_cache_path(),
        backend = ?settings.audio.backend,
        "settings resolved"
    );
}
