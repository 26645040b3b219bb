//! Logging infrastructure.
//!
//! Console output for interactive runs plus a daily-rolling file under the
//! warehouse directory, so batch rebuilds leave an inspectable trail of
//! row counts and dropped-row warnings. The default `info` filter can be
//! overridden with `RUST_LOG`.

use anyhow::{Context as _, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Initialize the logging system. When a log directory is given, a
/// `starmart.<date>.log` file is written there in addition to the console.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the file
/// appender fails to build.
pub fn init(log_dir: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stdout_layer = fmt::layer().with_target(true);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(10)
                .filename_prefix("starmart")
                .filename_suffix("log")
                .build(dir)
                .context("Failed to create log file appender")?;

            let file_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(appender);

            registry.with(file_layer).init();
        }
        None => registry.init(),
    }

    Ok(())
}

/// Path of today's log file within a log directory.
pub fn current_log_path(log_dir: &Path) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    log_dir.join(format!("starmart.{today}.log"))
}
