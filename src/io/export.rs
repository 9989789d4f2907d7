//! CSV export of sampled waveform and envelope data.
//!
//! The file is self-describing: a `#`-prefixed metadata preamble (sample
//! rate and duration once, then one line per waveform and per envelope),
//! a header row, and one data row per sample index. All columns share the
//! `Time` column's grid, and values are written with Rust's shortest
//! round-trip float formatting so a reader recovers them exactly.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::dsp::oscillator::{SampledSignal, WaveKind};

pub const MAX_ENVELOPE_LABEL: &str = "Max_Envelope";
pub const MIN_ENVELOPE_LABEL: &str = "Min_Envelope";
pub const RMS_ENVELOPE_LABEL: &str = "RMS_Envelope";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: no enabled waveforms")]
    Empty,
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One waveform's sampled arrays paired with its metadata.
#[derive(Debug, Clone)]
pub struct WaveformRecord {
    /// User-facing display name, kept verbatim in the metadata preamble.
    pub name: String,
    /// Header-safe column label derived from the name and kind.
    pub column: String,
    pub time: Vec<f64>,
    pub samples: Vec<f64>,
    pub kind: WaveKind,
    pub frequency: f64,
    pub amplitude: f64,
    pub offset: f64,
    pub duty_cycle: f64,
}

/// A derived envelope curve to export alongside the waveforms. The time
/// grid is shared with the waveform records and not repeated here.
#[derive(Debug, Clone)]
pub struct EnvelopeRecord {
    pub label: String,
    pub samples: Vec<f64>,
}

impl EnvelopeRecord {
    pub fn new(label: impl Into<String>, envelope: &SampledSignal) -> Self {
        Self {
            label: label.into(),
            samples: envelope.amplitude.clone(),
        }
    }
}

/// Pair a synthesized signal with its metadata for export.
#[allow(clippy::too_many_arguments)]
pub fn prepare(
    name: &str,
    signal: &SampledSignal,
    kind: WaveKind,
    frequency: f64,
    amplitude: f64,
    offset: f64,
    duty_cycle: f64,
) -> WaveformRecord {
    WaveformRecord {
        name: name.to_string(),
        column: column_label(name, kind),
        time: signal.time.clone(),
        samples: signal.amplitude.clone(),
        kind,
        frequency,
        amplitude,
        offset,
        duty_cycle,
    }
}

/// Derive a header-safe column label: non-alphanumeric characters become
/// underscores and the kind is appended, so the default first waveform
/// exports as `Waveform_1_Sine`.
fn column_label(name: &str, kind: WaveKind) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}", safe, kind.label())
}

/// Write the export table. Returns a short status string for the caller to
/// surface verbatim; expected failures (unwritable path, nothing enabled)
/// come back as values, never panics.
pub fn export(
    path: &Path,
    waveforms: &[WaveformRecord],
    envelopes: Option<&[EnvelopeRecord]>,
    sample_rate: f64,
    duration: f64,
) -> Result<String, ExportError> {
    if waveforms.is_empty() {
        return Err(ExportError::Empty);
    }
    let envelopes = envelopes.unwrap_or(&[]);

    let rows = waveforms[0].time.len();
    debug_assert!(
        waveforms.iter().all(|w| w.samples.len() == rows)
            && envelopes.iter().all(|e| e.samples.len() == rows),
        "export records must share one time grid"
    );

    let io_err = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# Waveform Export").map_err(io_err)?;
    writeln!(out, "# Sample Rate: {sample_rate} samples/s").map_err(io_err)?;
    writeln!(out, "# Duration: {duration} s").map_err(io_err)?;
    for record in waveforms {
        writeln!(
            out,
            "# {}: name=\"{}\", kind={}, frequency={}, amplitude={}, offset={}, duty_cycle={}",
            record.column,
            record.name.replace('"', "'"),
            record.kind.name(),
            record.frequency,
            record.amplitude,
            record.offset,
            record.duty_cycle,
        )
        .map_err(io_err)?;
    }
    for envelope in envelopes {
        writeln!(out, "# Envelope: {}", envelope.label).map_err(io_err)?;
    }

    write!(out, "Time").map_err(io_err)?;
    for record in waveforms {
        write!(out, ",{}", record.column).map_err(io_err)?;
    }
    for envelope in envelopes {
        write!(out, ",{}", envelope.label).map_err(io_err)?;
    }
    writeln!(out).map_err(io_err)?;

    for i in 0..rows {
        write!(out, "{}", waveforms[0].time[i]).map_err(io_err)?;
        for record in waveforms {
            write!(out, ",{}", record.samples[i]).map_err(io_err)?;
        }
        for envelope in envelopes {
            write!(out, ",{}", envelope.samples[i]).map_err(io_err)?;
        }
        writeln!(out).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    info!(
        path = %path.display(),
        waveforms = waveforms.len(),
        envelopes = envelopes.len(),
        rows,
        "export complete"
    );
    Ok(format!(
        "Exported {} waveform(s) and {} envelope(s) to {}",
        waveforms.len(),
        envelopes.len(),
        path.display()
    ))
}
