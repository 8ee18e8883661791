//! Logging setup for the `asthma-features` binary.
//!
//! Console output is always on. When a log directory is given, two daily
//! rotating files are written as well:
//!
//! - `asthma-features.<date>.log`: everything that passes the filter
//! - `error.<date>.log`: warnings and errors only
//!
//! The filter defaults to `info` and can be overridden with `RUST_LOG`.
//!
//! ```no_run
//! use asthma_features::logging;
//!
//! logging::init(None).expect("Failed to initialize logging");
//! tracing::info!("ready");
//! ```

use anyhow::{Context as _, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const LOG_PREFIX: &str = "asthma-features";
const MAX_LOG_FILES: usize = 10;

fn file_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to create {prefix} log appender"))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns error if the log directory cannot be created, an appender fails,
/// or a subscriber is already installed.
pub fn init(log_dir: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let file_layers = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            let all_logs = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(file_appender(dir, LOG_PREFIX)?);

            let error_logs = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(file_appender(dir, "error")?)
                .with_filter(EnvFilter::new("warn"));

            Some(all_logs.and_then(error_logs))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    match log_dir {
        Some(dir) => tracing::debug!("Logging initialized, log directory: {}", dir.display()),
        None => tracing::debug!("Logging initialized (console only)"),
    }
    Ok(())
}
