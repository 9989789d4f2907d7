//! wavescope - terminal waveform generator/analyzer
//!
//! Run with: cargo run

mod app;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use app::WavescopeApp;
use wavescope::io::config::ConfigStore;
use wavescope::state::Session;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let store = ConfigStore::new(config_path());
    let record = store.load();
    let session = Session::new(&record);

    let mut terminal = ratatui::init();
    let result = WavescopeApp::new(session, store).run(&mut terminal);
    ratatui::restore();
    result
}

/// Config lives in the platform config directory, falling back to the
/// working directory when none is available.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavescope")
        .join("config.toml")
}

/// Log to a file so tracing output never fights the terminal UI.
fn init_tracing() -> color_eyre::Result<()> {
    let path = std::env::temp_dir().join("wavescope.log");
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
