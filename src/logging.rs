use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::core::error::JobCardError;

const LOG_ENV_VAR: &str = "JOBCARD_LOG";

/// Sends all tracing output to `log_file`; the terminal belongs to the
/// dashboard. Keep the guard alive until exit so buffered lines flush.
pub fn init(log_file: &Path) -> Result<WorkerGuard, JobCardError> {
    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file.file_name().ok_or_else(|| JobCardError::Logging {
        message: format!("{} has no file name", log_file.display()),
    })?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| JobCardError::Logging {
            message: e.to_string(),
        })?;

    tracing::info!(path = %log_file.display(), "logging initialised");
    Ok(guard)
}
