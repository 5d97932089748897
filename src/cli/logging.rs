//! Logging initialization

use std::fs::File;
use std::path::PathBuf;

use crate::config::paths;

/// Initialize file logging
///
/// Logs go to `<data_dir>/kubetray.log` so the TUI keeps the terminal to
/// itself; if that file cannot be opened a temp file is used instead. The
/// level is `info`, or `debug` with the debug flag, and `RUST_LOG` overrides
/// both. Returns the log file path, or `None` if no file could be opened.
pub fn init_logging(debug: bool) -> Option<PathBuf> {
    let (path, file) = open_log_file()?;

    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_ansi(false)
        .with_target(true)
        .with_file(debug)
        .with_line_number(debug)
        .init();

    Some(path)
}

fn open_log_file() -> Option<(PathBuf, File)> {
    let path = paths::log_path();
    let opened = path
        .parent()
        .map_or(Ok(()), paths::ensure_dir)
        .and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        });
    if let Ok(file) = opened {
        return Some((path, file));
    }

    // Fallback: a named temp file that outlives this process
    let temp = tempfile::Builder::new()
        .prefix("kubetray-")
        .suffix(".log")
        .tempfile()
        .ok()?;
    let (file, path) = temp.keep().ok()?;
    Some((path, file))
}
