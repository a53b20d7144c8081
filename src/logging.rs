use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::Result;

/// Environment variable holding the log filter, e.g. `BACKDROP_LOG=debug`.
pub const LOG_ENV: &str = "BACKDROP_LOG";

/// Send logs to `path` (appending). Without a path nothing is installed:
/// the terminal belongs to the animation.
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file));

    // A subscriber may already be installed (tests); keep the existing one
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
    Ok(())
}
