use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

/*
Waveform Synthesis
==================

Every signal is sampled on a shared grid:

    N       = round(duration * sample_rate) + 1
    time[i] = i / sample_rate

The "+ 1" means the window always contains BOTH endpoints, 0 and duration.
Exports rely on this: a file written from a 1 s window at 1000 samples/s
has exactly 1001 rows, first row t = 0, last row t = 1.

Per-kind formulas, with phase φ(t) = frequency * t mod 1:

  sine       offset + amplitude * sin(2π * frequency * t)
  square     offset + amplitude   if φ < duty_cycle / 100
             offset - amplitude   otherwise
  sawtooth   offset + amplitude * (2φ - 1)
             (linear ramp -amplitude → +amplitude each period)
  triangle   offset - amplitude * (4|φ - 0.5| - 1)
             (ramp up over the first half-period, down over the second)

A zero frequency degenerates every kind to the constant offset. The duty
cycle only shapes square waves; the other kinds ignore it.
*/

/// The closed set of waveform families a spec can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveKind {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl WaveKind {
    /// All kinds, in the order the presentation layer cycles through them.
    pub const ALL: [WaveKind; 4] = [
        WaveKind::Sine,
        WaveKind::Square,
        WaveKind::Sawtooth,
        WaveKind::Triangle,
    ];

    /// Capitalized label, e.g. for column names and list entries.
    pub fn label(self) -> &'static str {
        match self {
            WaveKind::Sine => "Sine",
            WaveKind::Square => "Square",
            WaveKind::Sawtooth => "Sawtooth",
            WaveKind::Triangle => "Triangle",
        }
    }

    /// Lowercase name as persisted in the config record.
    pub fn name(self) -> &'static str {
        match self {
            WaveKind::Sine => "sine",
            WaveKind::Square => "square",
            WaveKind::Sawtooth => "sawtooth",
            WaveKind::Triangle => "triangle",
        }
    }

    /// Parse a persisted lowercase name. Unknown names return `None` so the
    /// config loader can fall back per field.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sine" => Some(WaveKind::Sine),
            "square" => Some(WaveKind::Square),
            "sawtooth" => Some(WaveKind::Sawtooth),
            "triangle" => Some(WaveKind::Triangle),
            _ => None,
        }
    }

    /// The kind after `self` in [`WaveKind::ALL`], wrapping around.
    pub fn next(self) -> Self {
        match self {
            WaveKind::Sine => WaveKind::Square,
            WaveKind::Square => WaveKind::Sawtooth,
            WaveKind::Sawtooth => WaveKind::Triangle,
            WaveKind::Triangle => WaveKind::Sine,
        }
    }

    /// Duty cycle only has meaning for square waves.
    pub fn uses_duty_cycle(self) -> bool {
        matches!(self, WaveKind::Square)
    }
}

impl fmt::Display for WaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One synthesized signal: two equal-length arrays on the shared grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledSignal {
    pub time: Vec<f64>,
    pub amplitude: Vec<f64>,
}

impl SampledSignal {
    /// Number of samples (identical for both arrays).
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Synthesize one waveform over `[0, duration]`.
///
/// Pure and deterministic. Inputs are assumed pre-clamped by the collection;
/// there are no error conditions.
pub fn generate(
    kind: WaveKind,
    frequency: f64,
    amplitude: f64,
    offset: f64,
    duty_cycle: f64,
    duration: f64,
    sample_rate: f64,
) -> SampledSignal {
    let samples = (duration * sample_rate).round() as usize + 1;
    let time: Vec<f64> = (0..samples).map(|i| i as f64 / sample_rate).collect();

    if frequency == 0.0 {
        // Degenerate case: every kind flattens to its offset.
        return SampledSignal {
            amplitude: vec![offset; samples],
            time,
        };
    }

    let threshold = duty_cycle / 100.0;
    let amplitude = time
        .iter()
        .map(|&t| {
            let phase = (frequency * t).fract();
            match kind {
                WaveKind::Sine => offset + amplitude * (TAU * frequency * t).sin(),
                WaveKind::Square => {
                    if phase < threshold {
                        offset + amplitude
                    } else {
                        offset - amplitude
                    }
                }
                WaveKind::Sawtooth => offset + amplitude * (2.0 * phase - 1.0),
                WaveKind::Triangle => offset - amplitude * (4.0 * (phase - 0.5).abs() - 1.0),
            }
        })
        .collect();

    SampledSignal { time, amplitude }
}
