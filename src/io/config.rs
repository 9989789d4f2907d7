//! The persisted defaults record.
//!
//! A small TOML key/value file read once at startup. Loading is total:
//! a missing file, an unparseable file, or any individually missing or
//! mistyped key falls back to the built-in default for that field alone.
//! Saving is atomic from the caller's perspective: the record is written
//! to a sibling temp file and renamed into place, so a failed write leaves
//! the previous file untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use toml::Table;
use tracing::{debug, info, warn};

use crate::dsp::oscillator::WaveKind;

/// Persisted defaults: seed values for new waveform specs, the startup
/// time window, and the display bounds.
///
/// Waveform-parameter fields only affect specs created after the next
/// process start; display-bound fields are additionally pushed live into
/// the display settings by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigRecord {
    pub duration: f64,
    pub waveform_type: WaveKind,
    pub frequency: f64,
    pub amplitude: f64,
    pub offset: f64,
    pub duty_cycle: f64,
    pub y_axis_title: String,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            duration: 1.0,
            waveform_type: WaveKind::Sine,
            frequency: 1.0,
            amplitude: 5.0,
            offset: 0.0,
            duty_cycle: 50.0,
            y_axis_title: "Amplitude".to_string(),
            y_min: -12.0,
            y_max: 12.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode defaults: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Loads and saves the defaults record at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. Never fails: every problem downgrades to the
    /// built-in default for the affected field(s).
    pub fn load(&self) -> ConfigRecord {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                if err.kind() == io::ErrorKind::NotFound {
                    debug!(path = %self.path.display(), "no config file, using defaults");
                } else {
                    warn!(path = %self.path.display(), %err, "config unreadable, using defaults");
                }
                return ConfigRecord::default();
            }
        };
        let table: Table = match text.parse() {
            Ok(table) => table,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "config unparseable, using defaults");
                return ConfigRecord::default();
            }
        };

        let defaults = ConfigRecord::default();
        ConfigRecord {
            duration: float_field(&table, "duration", defaults.duration),
            waveform_type: kind_field(&table, "waveform_type", defaults.waveform_type),
            frequency: float_field(&table, "frequency", defaults.frequency),
            amplitude: float_field(&table, "amplitude", defaults.amplitude),
            offset: float_field(&table, "offset", defaults.offset),
            duty_cycle: float_field(&table, "duty_cycle", defaults.duty_cycle),
            y_axis_title: string_field(&table, "y_axis_title", defaults.y_axis_title),
            y_min: float_field(&table, "y_min", defaults.y_min),
            y_max: float_field(&table, "y_max", defaults.y_max),
        }
    }

    /// Persist the whole record, or leave the store unchanged on failure.
    ///
    /// Field validity (e.g. `y_min < y_max`) is the caller's concern.
    pub fn save(&self, record: &ConfigRecord) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(record)?;

        let io_err = |source: io::Error| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let staging = self.path.with_extension("toml.tmp");
        fs::write(&staging, text).map_err(io_err)?;
        fs::rename(&staging, &self.path).map_err(io_err)?;

        info!(path = %self.path.display(), "defaults saved");
        Ok(())
    }
}

fn float_field(table: &Table, key: &str, fallback: f64) -> f64 {
    match table.get(key) {
        None => fallback,
        Some(value) => match value.as_float().or_else(|| value.as_integer().map(|i| i as f64)) {
            Some(number) => number,
            None => {
                warn!(key, "config field is not a number, using default");
                fallback
            }
        },
    }
}

fn string_field(table: &Table, key: &str, fallback: String) -> String {
    match table.get(key) {
        None => fallback,
        Some(value) => match value.as_str() {
            Some(text) => text.to_string(),
            None => {
                warn!(key, "config field is not a string, using default");
                fallback
            }
        },
    }
}

fn kind_field(table: &Table, key: &str, fallback: WaveKind) -> WaveKind {
    match table.get(key).and_then(|value| value.as_str()) {
        None => fallback,
        Some(name) => WaveKind::parse(name).unwrap_or_else(|| {
            warn!(key, name, "unknown waveform kind, using default");
            fallback
        }),
    }
}
