//! Application state and event loop for the terminal front-end.
//!
//! All rendering reads go through [`WavescopeApp`]; every mutation funnels
//! into the core session, so this layer stays strictly downstream of the
//! collection and display state.

use std::path::Path;
use std::time::Duration;

use crate::ui;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use wavescope::dsp::envelope::{compute_max, compute_min, compute_rms};
use wavescope::dsp::oscillator::{generate, SampledSignal};
use wavescope::io::config::{ConfigRecord, ConfigStore};
use wavescope::io::export::{
    self, EnvelopeRecord, WaveformRecord, MAX_ENVELOPE_LABEL, MIN_ENVELOPE_LABEL,
    RMS_ENVELOPE_LABEL,
};
use wavescope::state::collection::{AMPLITUDE, DUTY_CYCLE, FREQUENCY, MAX_WAVEFORMS, OFFSET};
use wavescope::state::display::TIME_SPAN;
use wavescope::state::{Session, WaveformSpec};
use wavescope::SAMPLE_RATE;

const EXPORT_FILE: &str = "waveforms.csv";

/// Which numeric field the left/right keys adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamFocus {
    Frequency,
    Amplitude,
    Offset,
    DutyCycle,
    TimeSpan,
}

impl ParamFocus {
    fn next(self) -> Self {
        match self {
            ParamFocus::Frequency => ParamFocus::Amplitude,
            ParamFocus::Amplitude => ParamFocus::Offset,
            ParamFocus::Offset => ParamFocus::DutyCycle,
            ParamFocus::DutyCycle => ParamFocus::TimeSpan,
            ParamFocus::TimeSpan => ParamFocus::Frequency,
        }
    }
}

/// Keyboard routing state.
pub enum InputMode {
    Normal,
    /// Collecting a new display name for the active waveform.
    Rename { buffer: String },
}

/// One curve ready for the chart, with its legend label and color.
pub struct Curve {
    pub label: String,
    pub color: (u8, u8, u8),
    pub signal: SampledSignal,
    pub dashed: bool,
}

pub struct WavescopeApp {
    pub session: Session,
    store: ConfigStore,
    pub focus: ParamFocus,
    pub mode: InputMode,
    /// Last status message, surfaced verbatim in the status bar.
    pub status: String,
    should_quit: bool,
}

impl WavescopeApp {
    pub fn new(session: Session, store: ConfigStore) -> Self {
        Self {
            session,
            store,
            focus: ParamFocus::Frequency,
            mode: InputMode::Normal,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }

    /// Run the UI event loop.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        if matches!(self.mode, InputMode::Normal) {
            self.handle_normal_key(key);
        } else {
            self.handle_rename_key(key);
        }
    }

    fn handle_normal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('a') => self.add_waveform(),
            KeyCode::Char('x') => self.remove_active(),
            KeyCode::Down | KeyCode::Char('j') => self.select_neighbor(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_neighbor(-1),
            KeyCode::Char(' ') => self.toggle_active_enabled(),
            KeyCode::Char('t') => self.cycle_kind(),
            KeyCode::Char('r') => {
                let name = self.session.collection().active().name().to_string();
                self.mode = InputMode::Rename { buffer: name };
            }
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::Right | KeyCode::Char('+') => self.adjust_focused(1.0),
            KeyCode::Left | KeyCode::Char('-') => self.adjust_focused(-1.0),
            KeyCode::Char('m') => self.toggle_envelope(Envelope::Max),
            KeyCode::Char('n') => self.toggle_envelope(Envelope::Min),
            KeyCode::Char('e') => self.toggle_envelope(Envelope::Rms),
            KeyCode::Char('g') => {
                let display = self.session.display_mut();
                display.show_grid = !display.show_grid;
            }
            KeyCode::Char('v') => self.reset_view(),
            KeyCode::Char('s') => self.export(Path::new(EXPORT_FILE)),
            KeyCode::Char('w') => self.save_defaults(),
            _ => {}
        }
    }

    fn handle_rename_key(&mut self, key: KeyCode) {
        let InputMode::Rename { buffer } = &mut self.mode else {
            return;
        };
        match key {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Enter => {
                let name = buffer.clone();
                let id = self.session.collection().active_id();
                match self.session.collection_mut().rename(id, &name) {
                    Ok(()) => {
                        self.mode = InputMode::Normal;
                        self.status = "Renamed".to_string();
                    }
                    // Stay in rename mode so the user can pick another name.
                    Err(err) => self.status = err.to_string(),
                }
            }
            _ => {}
        }
    }

    fn add_waveform(&mut self) {
        let collection = self.session.collection_mut();
        match collection.add() {
            Some(id) => {
                collection.set_active(id);
                self.status = format!("Added waveform {}/{MAX_WAVEFORMS}", collection.len());
            }
            None if collection.source_hidden() => {
                self.status = "Hide envelopes to edit the waveform list".to_string();
            }
            None => self.status = format!("Limit of {MAX_WAVEFORMS} waveforms reached"),
        }
    }

    fn remove_active(&mut self) {
        let id = self.session.collection().active_id();
        if self.session.remove(id) {
            self.status = "Removed".to_string();
        } else if self.session.collection().source_hidden() {
            self.status = "Hide envelopes to edit the waveform list".to_string();
        } else {
            self.status = "At least one waveform is required".to_string();
        }
    }

    /// Move the active selection up or down the list, saturating at the ends.
    fn select_neighbor(&mut self, direction: isize) {
        let collection = self.session.collection();
        let ids: Vec<_> = collection.iter().map(WaveformSpec::id).collect();
        let Some(position) = ids.iter().position(|&id| id == collection.active_id()) else {
            return;
        };
        let target = position.saturating_add_signed(direction).min(ids.len() - 1);
        let id = ids[target];
        self.session.collection_mut().set_active(id);
    }

    fn toggle_active_enabled(&mut self) {
        let active = self.session.collection().active();
        let (id, enabled) = (active.id(), active.enabled());
        self.session.set_enabled(id, !enabled);
    }

    fn cycle_kind(&mut self) {
        let active = self.session.collection().active();
        let (id, next) = (active.id(), active.kind().next());
        self.session.collection_mut().set_kind(id, next);
    }

    fn adjust_focused(&mut self, direction: f64) {
        let id = self.session.collection().active_id();
        let spec = self.session.collection().active();
        match self.focus {
            ParamFocus::Frequency => {
                let value = spec.frequency() + direction * FREQUENCY.step;
                self.session.collection_mut().set_frequency(id, value);
            }
            ParamFocus::Amplitude => {
                let value = spec.amplitude() + direction * AMPLITUDE.step;
                self.session.collection_mut().set_amplitude(id, value);
            }
            ParamFocus::Offset => {
                let value = spec.offset() + direction * OFFSET.step;
                self.session.collection_mut().set_offset(id, value);
            }
            ParamFocus::DutyCycle => {
                let value = spec.duty_cycle() + direction * DUTY_CYCLE.step;
                self.session.collection_mut().set_duty_cycle(id, value);
            }
            ParamFocus::TimeSpan => {
                let value = self.session.display().time_span() + direction * TIME_SPAN.step;
                self.session.display_mut().set_time_span(value);
            }
        }
    }

    fn toggle_envelope(&mut self, which: Envelope) {
        let display = self.session.display();
        let (shown, set): (bool, fn(&mut Session, bool) -> bool) = match which {
            Envelope::Max => (display.show_max_envelope(), Session::set_show_max_envelope),
            Envelope::Min => (display.show_min_envelope(), Session::set_show_min_envelope),
            Envelope::Rms => (display.show_rms_envelope(), Session::set_show_rms_envelope),
        };
        if !set(&mut self.session, !shown) {
            self.status = "Envelopes need at least two enabled waveforms".to_string();
        }
    }

    fn reset_view(&mut self) {
        let default_span = self.store.load().duration;
        self.session.display_mut().set_time_span(default_span);
        self.status = "View reset".to_string();
    }

    /// Synthesize every enabled waveform on the current grid.
    fn synthesize_enabled(&self) -> Vec<(String, (u8, u8, u8), SampledSignal)> {
        let duration = self.session.display().time_span();
        self.session
            .collection()
            .enabled_members()
            .map(|spec| {
                let signal = generate(
                    spec.kind(),
                    spec.frequency(),
                    spec.amplitude(),
                    spec.offset(),
                    spec.duty_cycle(),
                    duration,
                    SAMPLE_RATE,
                );
                (spec.name().to_string(), spec.color(), signal)
            })
            .collect()
    }

    /// Curves for the chart: sources (unless hidden) plus any envelopes.
    pub fn visible_curves(&self) -> Vec<Curve> {
        let synthesized = self.synthesize_enabled();
        let mut curves = Vec::new();

        if !self.session.collection().source_hidden() {
            for (label, color, signal) in &synthesized {
                curves.push(Curve {
                    label: label.clone(),
                    color: *color,
                    signal: signal.clone(),
                    dashed: false,
                });
            }
        }

        if self.session.can_show_envelopes() && !synthesized.is_empty() {
            let signals: Vec<SampledSignal> =
                synthesized.into_iter().map(|(_, _, s)| s).collect();
            let display = self.session.display();
            let mut envelope = |label: &str, color, signal| {
                curves.push(Curve {
                    label: label.to_string(),
                    color,
                    signal,
                    dashed: true,
                });
            };
            if display.show_max_envelope() {
                envelope("Max Envelope", (0, 0, 139), compute_max(&signals));
            }
            if display.show_min_envelope() {
                envelope("Min Envelope", (255, 0, 0), compute_min(&signals));
            }
            if display.show_rms_envelope() {
                envelope("RMS Envelope", (255, 0, 255), compute_rms(&signals));
            }
        }

        curves
    }

    /// Export every enabled waveform (and any shown envelopes) to CSV.
    fn export(&mut self, path: &Path) {
        let duration = self.session.display().time_span();
        let mut records: Vec<WaveformRecord> = Vec::new();
        let mut signals: Vec<SampledSignal> = Vec::new();

        for spec in self.session.collection().enabled_members() {
            let signal = generate(
                spec.kind(),
                spec.frequency(),
                spec.amplitude(),
                spec.offset(),
                spec.duty_cycle(),
                duration,
                SAMPLE_RATE,
            );
            records.push(export::prepare(
                spec.name(),
                &signal,
                spec.kind(),
                spec.frequency(),
                spec.amplitude(),
                spec.offset(),
                spec.duty_cycle(),
            ));
            signals.push(signal);
        }

        let mut envelopes: Vec<EnvelopeRecord> = Vec::new();
        if self.session.can_show_envelopes() && !signals.is_empty() {
            let display = self.session.display();
            if display.show_max_envelope() {
                envelopes.push(EnvelopeRecord::new(MAX_ENVELOPE_LABEL, &compute_max(&signals)));
            }
            if display.show_min_envelope() {
                envelopes.push(EnvelopeRecord::new(MIN_ENVELOPE_LABEL, &compute_min(&signals)));
            }
            if display.show_rms_envelope() {
                envelopes.push(EnvelopeRecord::new(RMS_ENVELOPE_LABEL, &compute_rms(&signals)));
            }
        }

        let envelopes = (!envelopes.is_empty()).then_some(envelopes);
        self.status = match export::export(
            path,
            &records,
            envelopes.as_deref(),
            SAMPLE_RATE,
            duration,
        ) {
            Ok(message) => message,
            Err(err) => err.to_string(),
        };
    }

    /// Save the active waveform's parameters plus the current view as the
    /// new defaults record.
    fn save_defaults(&mut self) {
        let spec = self.session.collection().active();
        let display = self.session.display();
        if display.y_min >= display.y_max {
            self.status = "Display bounds are invalid, not saving".to_string();
            return;
        }
        let record = ConfigRecord {
            duration: display.time_span(),
            waveform_type: spec.kind(),
            frequency: spec.frequency(),
            amplitude: spec.amplitude(),
            offset: spec.offset(),
            duty_cycle: spec.duty_cycle(),
            y_axis_title: display.y_axis_title.clone(),
            y_min: display.y_min,
            y_max: display.y_max,
        };
        self.status = match self.store.save(&record) {
            Ok(()) => format!("Defaults saved to {}", self.store.path().display()),
            Err(err) => err.to_string(),
        };
    }
}

#[derive(Clone, Copy)]
enum Envelope {
    Max,
    Min,
    Rms,
}
