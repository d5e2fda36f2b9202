//! tracing-subscriber setup for mentor-dash.
//!
//! One-shot commands log to stderr. The interactive console logs to a file
//! under the work dir instead, so warnings about fallbacks and failed
//! requests stay out of the prompt.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::AppError;

/// Install the global subscriber. Call once, after the level is resolved.
///
/// With `cli_override` set (the user passed `-v`), `level` beats `RUST_LOG`.
/// Otherwise `RUST_LOG` wins and `level` (from env or config) is the default.
pub fn init(level: &str, cli_override: bool, log_file: Option<&Path>) -> Result<(), AppError> {
    let filter = filter_for(level, cli_override)?;
    let writer = match log_file {
        Some(path) => BoxMakeWriter::new(open_log_file(path)?),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

fn filter_for(level: &str, cli_override: bool) -> Result<EnvFilter, AppError> {
    let invalid =
        |e: &dyn std::fmt::Display| AppError::Logger(format!("invalid log level '{level}': {e}"));
    if cli_override {
        return EnvFilter::try_new(level).map_err(|e| invalid(&e));
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| invalid(&e))
}

/// Append-mode log file; missing parent directories are created.
fn open_log_file(path: &Path) -> Result<File, AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path).map_err(|e| {
        AppError::Logger(format!("cannot open log file {}: {e}", path.display()))
    })
}

/// Check a level from config or `MENTOR_LOG_LEVEL` before the subscriber exists.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

/// `-v` count to level: 1 info, 2 debug, 3+ trace, 0 leaves it to config.
pub fn level_for_verbosity(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
