use crate::error::ConfigError;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// File written into the output directory alongside the report.
pub const LOG_FILE_NAME: &str = "analyzer.log";

/// Installs the global subscriber: human-readable lines on stdout plus a
/// non-blocking copy in `<log_dir>/analyzer.log`. `log_dir` is created when
/// missing.
///
/// The filter defaults to `info` and can be overridden through `RUST_LOG`.
/// The returned guard must be held until the program exits so buffered lines
/// are flushed.
pub fn init_tracing(log_dir: &Path) -> Result<WorkerGuard, ConfigError> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| ConfigError::Logging(format!("cannot create {}: {}", log_dir.display(), e)))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("out");

        let guard = init_tracing(&log_dir).unwrap();
        tracing::info!("log directory ready");
        drop(guard);

        assert!(log_dir.is_dir());
        assert!(log_dir.join(LOG_FILE_NAME).exists());
    }
}
