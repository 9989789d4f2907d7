//! Sidebar: waveform list, active-waveform parameters, envelope toggles

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{ParamFocus, WavescopeApp};
use wavescope::state::collection::{ParamRange, AMPLITUDE, DUTY_CYCLE, FREQUENCY, OFFSET};
use wavescope::state::display::TIME_SPAN;

pub fn render_panel(frame: &mut Frame, area: Rect, app: &WavescopeApp) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Waveform list
            Constraint::Min(9),    // Parameters
            Constraint::Length(5), // Envelopes
        ])
        .split(area);

    render_list(frame, sections[0], app);
    render_parameters(frame, sections[1], app);
    render_envelopes(frame, sections[2], app);
}

fn render_list(frame: &mut Frame, area: Rect, app: &WavescopeApp) {
    let collection = app.session.collection();
    let lines: Vec<Line> = collection
        .iter()
        .map(|spec| {
            let (r, g, b) = spec.color();
            let marker = if spec.id() == collection.active_id() {
                "> "
            } else {
                "  "
            };
            let state = if spec.enabled() { "ON " } else { "OFF" };
            let state_color = if spec.enabled() {
                Color::Green
            } else {
                Color::DarkGray
            };
            let mut style = Style::default().fg(Color::Rgb(r, g, b));
            if spec.id() == collection.active_id() {
                style = style.add_modifier(Modifier::BOLD);
            }
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<18}", spec.name()), style),
                Span::styled(state, Style::default().fg(state_color)),
                Span::styled(
                    format!(" {}", spec.kind()),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let block = Block::default().title(" Waveforms ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_parameters(frame: &mut Frame, area: Rect, app: &WavescopeApp) {
    let spec = app.session.collection().active();
    let time_span = app.session.display().time_span();

    let mut lines = vec![
        param_line(app, ParamFocus::Frequency, "Frequency (Hz)", spec.frequency(), FREQUENCY),
        param_line(app, ParamFocus::Amplitude, "Amplitude", spec.amplitude(), AMPLITUDE),
        param_line(app, ParamFocus::Offset, "Offset", spec.offset(), OFFSET),
    ];
    // Duty cycle is only meaningful for square waves.
    if spec.kind().uses_duty_cycle() {
        lines.push(param_line(
            app,
            ParamFocus::DutyCycle,
            "Duty Cycle (%)",
            spec.duty_cycle(),
            DUTY_CYCLE,
        ));
    }
    lines.push(Line::raw(""));
    lines.push(param_line(
        app,
        ParamFocus::TimeSpan,
        "Time Span (s)",
        time_span,
        TIME_SPAN,
    ));

    let block = Block::default().title(" Parameters ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One parameter row with a focus marker and bound indicators.
fn param_line(
    app: &WavescopeApp,
    focus: ParamFocus,
    label: &str,
    value: f64,
    range: ParamRange,
) -> Line<'static> {
    let marker = if app.focus == focus { "> " } else { "  " };
    let bound = if range.at_min(value) {
        " (min)"
    } else if range.at_max(value) {
        " (max)"
    } else {
        ""
    };
    let style = if app.focus == focus {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{label:<15} {value:>7.1}"), style),
        Span::styled(bound, Style::default().fg(Color::DarkGray)),
    ])
}

fn render_envelopes(frame: &mut Frame, area: Rect, app: &WavescopeApp) {
    let display = app.session.display();
    let available = app.session.can_show_envelopes();
    let label_color = if available {
        Color::White
    } else {
        Color::DarkGray
    };

    let flag = |shown: bool| if shown { "[x]" } else { "[ ]" };
    let lines = vec![
        Line::styled(
            format!("{} Max Envelope", flag(display.show_max_envelope())),
            Style::default().fg(label_color),
        ),
        Line::styled(
            format!("{} Min Envelope", flag(display.show_min_envelope())),
            Style::default().fg(label_color),
        ),
        Line::styled(
            format!("{} RMS Envelope", flag(display.show_rms_envelope())),
            Style::default().fg(label_color),
        ),
    ];

    let block = Block::default().title(" Envelopes ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
