//! TUI module for wavescope
//!
//! A sidebar with the waveform list and parameters, a chart of the
//! synthesized curves, and a status bar. Purely a view over the app state;
//! no core mutation happens during rendering.

mod chart;
mod panel;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{InputMode, WavescopeApp};
use wavescope::state::collection::MAX_WAVEFORMS;

use chart::render_chart;
use panel::render_panel;

/// Render one frame.
pub fn render(frame: &mut Frame, app: &WavescopeApp) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Sidebar + chart
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(20)])
        .split(rows[0]);

    render_panel(frame, columns[0], app);
    render_chart(frame, columns[1], app);

    // Status bar: collection occupancy plus the last core status verbatim.
    let status = match &app.mode {
        InputMode::Rename { buffer } => format!(" Rename: {buffer}_"),
        InputMode::Normal => format!(
            " Waveforms: {}/{}  |  {}",
            app.session.collection().len(),
            MAX_WAVEFORMS,
            app.status
        ),
    };
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::White)),
        rows[1],
    );

    let help = Paragraph::new(
        " [Q] Quit  [A] Add  [X] Remove  [J/K] Select  [Space] On/Off  [T] Type  [R] Rename  \
         [Tab] Field  [←/→] Adjust  [M/N/E] Envelopes  [G] Grid  [V] Reset  [S] Export  [W] Save",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);
}
