//! Tracing initialization for the suite run.
//!
//! Log lines go to stderr and to the execution log file; the failure
//! triage later attaches that same file to failing tests' report entries.

use crate::error::{CliError, CliResult};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber with a stderr layer and a file layer
/// writing to `log_path`. The file's parent directory is created if needed.
pub fn init(log_path: &Path) -> CliResult<()> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(log_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(file));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| CliError::config(format!("failed to initialize tracing: {e}")))?;
    Ok(())
}
