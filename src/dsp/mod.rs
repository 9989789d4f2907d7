//! Pure signal math: waveform synthesis and envelope aggregation.
//!
//! Everything in here is a deterministic in-memory array computation with
//! no I/O and no shared state. These functions intentionally stay focused
//! on the numeric formulas so the session layer can own validation and the
//! presentation layer stays strictly downstream.

/// Per-sample max/min/RMS curves across aligned signals.
pub mod envelope;
/// Parametric waveform families and the sampling grid.
pub mod oscillator;

pub use oscillator::{SampledSignal, WaveKind};
