//! Waveform chart widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::app::WavescopeApp;

/// Render every visible curve on shared axes.
pub fn render_chart(frame: &mut Frame, area: Rect, app: &WavescopeApp) {
    let display = app.session.display();
    let time_span = display.time_span();
    let (y_min, y_max) = (display.y_min, display.y_max);

    let curves = app.visible_curves();
    let points: Vec<Vec<(f64, f64)>> = curves
        .iter()
        .map(|curve| {
            curve
                .signal
                .time
                .iter()
                .copied()
                .zip(curve.signal.amplitude.iter().copied())
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = curves
        .iter()
        .zip(&points)
        .map(|(curve, data)| {
            let (r, g, b) = curve.color;
            Dataset::default()
                .name(curve.label.clone())
                .marker(if curve.dashed {
                    symbols::Marker::Dot
                } else {
                    symbols::Marker::Braille
                })
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Rgb(r, g, b)))
                .data(data)
        })
        .collect();

    let axis_style = Style::default().fg(Color::DarkGray);
    let x_labels = axis_labels(0.0, time_span, display.show_grid);
    let y_labels = axis_labels(y_min, y_max, display.show_grid);

    let chart = Chart::new(datasets)
        .block(Block::default().title(" Signals ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Time (s)")
                .bounds([0.0, time_span])
                .labels(x_labels)
                .style(axis_style),
        )
        .y_axis(
            Axis::default()
                .title(display.y_axis_title.clone())
                .bounds([y_min, y_max])
                .labels(y_labels)
                .style(axis_style),
        );

    frame.render_widget(chart, area);
}

/// Axis tick labels; the midpoint is dropped when the grid is off.
fn axis_labels(min: f64, max: f64, show_grid: bool) -> Vec<Span<'static>> {
    let format = |v: f64| Span::raw(format!("{v:.1}"));
    if show_grid {
        vec![format(min), format((min + max) / 2.0), format(max)]
    } else {
        vec![format(min), format(max)]
    }
}
