pub mod dsp;
pub mod io;
pub mod state;

/// Samples per unit time used to discretize every time window.
///
/// Every signal in a session is sampled at this rate, which is what keeps
/// the sample grids aligned for envelope aggregation and export.
pub const SAMPLE_RATE: f64 = 1_000.0;
