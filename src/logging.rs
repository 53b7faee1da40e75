//! Tracing setup: stderr plus an hourly-rotated file in the logs directory

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{MonitorError, Result};

pub const LOG_FILE_PREFIX: &str = "hostwatch";

/// Build the level filter: `RUST_LOG` wins over the configured level, and an
/// unparseable level falls back to `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. The returned guard flushes the file
/// writer on drop and must be held until the process exits.
pub fn init_logging(log_dir: &Path, level: &str) -> Result<WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| {
            MonitorError::io(
                format!("Failed to create log file in {}", log_dir.display()),
                std::io::Error::other(e.to_string()),
            )
        })?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| {
            MonitorError::io(
                "Failed to install logger",
                std::io::Error::other(e.to_string()),
            )
        })?;

    tracing::info!(log_level = level, "Logging initialized");
    Ok(guard)
}

/// Stderr-only logging for when the logs directory is unusable
pub fn init_stderr_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
