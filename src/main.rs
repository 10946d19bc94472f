mod app;
mod audio;
mod config;
mod error;
mod library;
mod playlist;
mod presence;
mod queue;
mod runtime;
mod ui;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics go to stderr so they stay out of the shell's stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "osu_listener=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    runtime::run()
}
