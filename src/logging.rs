//! Tracing subscriber setup.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::Error;
use crate::settings::LogSettings;

/// Installs the global subscriber: human-readable lines on stdout and, when
/// enabled, the same lines without colour appended to `<dir>/app.log`.
///
/// Returns `false` when a global subscriber was already installed; the
/// existing one is kept and this configuration, file layer included, is
/// not applied.
///
/// `RUST_LOG` overrides the configured level. Rotating the file is left to
/// the host (logrotate, the container runtime, ...).
pub fn init(settings: &LogSettings) -> Result<bool, Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let file_layer = if settings.file_enabled {
        fs::create_dir_all(&settings.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(settings.dir.join("app.log"))?;
        Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
    } else {
        None
    };

    // A second call (tests, embedding) keeps the first subscriber.
    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
    {
        debug!(%err, file_enabled = settings.file_enabled, "subscriber already installed, keeping it");
        return Ok(false);
    }
    Ok(true)
}
