//! File-backed tracing setup.
//!
//! The TUI owns the terminal, so nothing may write to stdout: all logs go
//! to a daily-rolling JSON file under the app data directory, and standard
//! `log` macros are bridged into `tracing`.

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize logging for TUI mode.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered logs are flushed on shutdown.
pub fn init_tui() -> WorkerGuard {
    let log_dir = log_dir();

    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {e}");
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "grimoire.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSON format for easy parsing; no stdout layer — the TUI owns the terminal
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(file_layer).init();

    // Redirect standard `log` macros to `tracing`
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {e}");
    }

    guard
}

/// Logs live in the app data directory, not the working tree.
fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("grimoire").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
