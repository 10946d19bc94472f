use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

const APP_DIR: &str = "osu-listener";

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `OSU_LISTENER__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from the optional config file and environment.
    ///
    /// `explicit` (from `--config`) takes priority over the resolved default path.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let config_path = explicit.map(Path::to_path_buf).or_else(resolve_config_path);

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("OSU_LISTENER")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.tick_ms == 0 {
            return Err("playback.tick_ms must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err("audio.volume must be between 0.0 and 1.0".to_string());
        }
        if self.presence.refresh_secs == 0 {
            return Err("presence.refresh_secs must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `OSU_LISTENER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("OSU_LISTENER_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/osu-listener/config.toml`, or `~/.config/...` when
/// `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join(APP_DIR).join("config.toml"))
}

/// `$XDG_DATA_HOME/osu-listener`, or `~/.local/share/osu-listener`.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join(APP_DIR))
}
