//! Unified infrastructure error type.

use crate::api_error::BoxError;

/// The error type returned by rampart's fallible infrastructure operations.
///
/// Application-level failures (401, 400, ...) are
/// [`HandlerError`](crate::HandlerError) values written out as JSON
/// envelopes, never `Error`s. This type surfaces failures around them:
/// loading settings, binding a port, reading a request body.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings {path}: {source}")]
    Settings {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid listen address `{0}`")]
    Addr(String),

    #[error("reading request body: {0}")]
    Body(#[source] BoxError),
}
