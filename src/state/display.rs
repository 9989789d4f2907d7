//! Process-wide display settings. Not persisted; seeded from the config
//! record at startup and mutated at runtime.

use crate::io::config::ConfigRecord;
use crate::state::collection::ParamRange;

/// Bounds for the sampled time window length.
pub const TIME_SPAN: ParamRange = ParamRange::new(0.1, 10.0, 0.1);

#[derive(Debug, Clone)]
pub struct DisplaySettings {
    time_span: f64,
    pub(super) show_max_envelope: bool,
    pub(super) show_min_envelope: bool,
    pub(super) show_rms_envelope: bool,
    pub show_grid: bool,
    pub y_min: f64,
    pub y_max: f64,
    pub y_axis_title: String,
}

impl DisplaySettings {
    pub fn from_config(record: &ConfigRecord) -> Self {
        Self {
            time_span: TIME_SPAN.clamp(record.duration),
            show_max_envelope: false,
            show_min_envelope: false,
            show_rms_envelope: false,
            show_grid: true,
            y_min: record.y_min,
            y_max: record.y_max,
            y_axis_title: record.y_axis_title.clone(),
        }
    }

    pub fn time_span(&self) -> f64 {
        self.time_span
    }

    /// Clamped into [`TIME_SPAN`].
    pub fn set_time_span(&mut self, value: f64) {
        self.time_span = TIME_SPAN.clamp(value);
    }

    pub fn show_max_envelope(&self) -> bool {
        self.show_max_envelope
    }

    pub fn show_min_envelope(&self) -> bool {
        self.show_min_envelope
    }

    pub fn show_rms_envelope(&self) -> bool {
        self.show_rms_envelope
    }

    pub fn any_envelope_shown(&self) -> bool {
        self.show_max_envelope || self.show_min_envelope || self.show_rms_envelope
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::from_config(&ConfigRecord::default())
    }
}
