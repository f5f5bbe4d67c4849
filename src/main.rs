#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::fs;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_appender::non_blocking::WorkerGuard;

use outline_settings::storage::OutlineStore;
use outline_settings::tui::App;

const LOG_FILE: &str = "outline-settings.log";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "outline-settings", version, about = "Edit course outline settings")]
struct Args {
    /// Outline file to edit. Defaults to `outline.json` in the data directory.
    path: Option<PathBuf>,
    /// Data directory for the outline, update journal and log file.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let data_dir = OutlineStore::data_dir(args.data_dir.clone())?;
    fs::create_dir_all(&data_dir)?;
    let _log_guard = configure_logging(&data_dir);

    let store = match args.path {
        Some(path) => OutlineStore::with_path(path)?,
        None => OutlineStore::new(Some(data_dir))?,
    };

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        tracing::error!(?info, "panic");
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    tracing::info!("startup");
    let mut app = App::new(store);
    let result = app.run(&mut terminal);

    let restore_result = restore_terminal();
    tracing::info!("shutdown");
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

/// Logs to a file in `dir`, filtered by `RUST_LOG`. The returned guard
/// flushes the writer when dropped.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn configure_logging(dir: &Path) -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
