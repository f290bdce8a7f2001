//! Application settings.
//!
//! Loaded once at startup from YAML into an immutable [`Settings`] value,
//! which is then handed to every component that needs it. Any key missing
//! from the file keeps its default.
//!
//! ```yaml
//! log:
//!   file-enabled: false
//!   level: info
//!   dir: ./logs
//! server:
//!   host: 0.0.0.0
//!   port: "8080"
//! authorization:
//!   enabled: true
//!   header: Api-Key
//!   key: change-me
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Error;

/// Probed in order; the first file that exists wins.
pub const SEARCH_PATHS: [&str; 2] = ["./app.yml", "./configs/app.yml"];

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub server: ServerSettings,
    pub authorization: AuthorizationSettings,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogSettings {
    /// Also append log lines to `<dir>/app.log`.
    pub file_enabled: bool,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub dir: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { file_enabled: false, level: "info".to_owned(), dir: PathBuf::from("./logs") }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_owned(), port: "8080".to_owned() }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct AuthorizationSettings {
    pub enabled: bool,
    pub header: String,
    pub key: String,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self { enabled: false, header: "Api-Key".to_owned(), key: String::new() }
    }
}

/// Settings plus where they came from.
///
/// Loading happens before logging is configured (the log level is itself a
/// setting), so the probe results are kept here and reported by
/// [`Loaded::log`] once a subscriber is installed.
#[derive(Debug)]
pub struct Loaded {
    pub settings: Settings,
    /// The file that was read, if any.
    pub source: Option<PathBuf>,
    /// Probed paths that did not exist, in probe order.
    pub missing: Vec<PathBuf>,
}

impl Loaded {
    pub fn log(&self) {
        for path in &self.missing {
            warn!(path = %path.display(), "settings not found");
        }
        match &self.source {
            Some(path) => info!(path = %path.display(), "settings found"),
            None => info!("no settings file, using defaults"),
        }
    }
}

impl Settings {
    /// Loads settings from the first of [`SEARCH_PATHS`] that exists, or
    /// the defaults when none does.
    pub fn load() -> Result<Loaded, Error> {
        Self::load_from(&SEARCH_PATHS)
    }

    /// Like [`load`](Self::load) with an explicit probe list.
    pub fn load_from<P: AsRef<Path>>(paths: &[P]) -> Result<Loaded, Error> {
        let mut missing = Vec::new();
        for path in paths {
            let path: &Path = path.as_ref();
            match fs::read_to_string(path) {
                Ok(yaml) => {
                    let settings = Self::from_yaml(&yaml).map_err(|source| Error::Settings {
                        path: path.display().to_string(),
                        source,
                    })?;
                    return Ok(Loaded { settings, source: Some(path.to_owned()), missing });
                }
                Err(e) if e.kind() == ErrorKind::NotFound => missing.push(path.to_owned()),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Loaded { settings: Self::default(), source: None, missing })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserialises as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// `host:port` as configured.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
