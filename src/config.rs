// SPDX-License-Identifier: MIT
//
// Settings — optional TOML file with startup values.
//
// Lookup order:
//
//   1. `--config PATH`: must exist and parse, otherwise the run fails.
//   2. `<platform config dir>/n-palette/settings.toml`: used when present;
//      unreadable or malformed files fall back to defaults with a warning.
//   3. Built-in defaults.
//
// Every key is optional. An invalid `base_color` is replaced by the default
// rather than rejected, so a typo never keeps the tool from starting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use n_color::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shell::Timings;

pub const DEFAULT_BASE_COLOR: &str = "#3498db";

const APP_QUALIFIER: &str = "";
const APP_ORG: &str = "";
const APP_NAME: &str = "n-palette";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial content of the base-color field.
    pub base_color: String,
    /// Where `color-palette.png` is saved.
    pub export_dir: PathBuf,
    pub toast_ms: u64,
    /// How long "Copied!" stays on a swatch.
    pub copied_ms: u64,
    /// Event-loop ticks per second.
    pub tick_hz: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_color: DEFAULT_BASE_COLOR.to_owned(),
            export_dir: PathBuf::from("."),
            toast_ms: 2000,
            copied_ms: 2000,
            tick_hz: 60,
        }
    }
}

impl Settings {
    /// Load from `explicit`, or from the default location when `None`.
    ///
    /// # Errors
    ///
    /// Only for an explicit path that cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_default_location()),
        }
    }

    /// Read and parse one file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse TOML text, repairing an invalid base color.
    ///
    /// # Errors
    ///
    /// Malformed TOML or wrongly typed values.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(text).map(Self::validated)
    }

    /// `<config dir>/settings.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    fn from_default_location() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::debug!("no platform config dir, using defaults");
            return Self::default();
        };
        match Self::from_file(&path) {
            Ok(settings) => settings,
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring settings file");
                Self::default()
            }
        }
    }

    fn validated(mut self) -> Self {
        if Color::parse(&self.base_color).is_err() {
            tracing::warn!(
                base_color = %self.base_color,
                "invalid base_color in settings, using {DEFAULT_BASE_COLOR}"
            );
            self.base_color = DEFAULT_BASE_COLOR.to_owned();
        }
        self
    }

    pub const fn timings(&self) -> Timings {
        Timings {
            toast: Duration::from_millis(self.toast_ms),
            copied: Duration::from_millis(self.copied_ms),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
