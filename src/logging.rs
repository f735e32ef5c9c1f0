//! Subscriber setup: stdout plus a daily rolling log file.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "app";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const DEFAULT_RETENTION_DAYS: usize = 30;

/// Daily rotated `app.YYYY-MM-DD.log` files in `dir`, keeping at most
/// `retention_days` of them.
pub fn daily_appender(dir: &Path, retention_days: usize) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(retention_days.max(1))
        .build(dir)?;
    Ok(appender)
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level`. The file sink only records INFO and above.
/// The returned guard flushes the file writer when dropped, so keep it
/// alive for the lifetime of the process.
pub fn init(level: &str, log_dir: &Path, retention_days: usize) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (file_writer, guard) = tracing_appender::non_blocking(daily_appender(log_dir, retention_days)?);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(LevelFilter::INFO),
        )
        .try_init()?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_daily_appender_writes_dated_file() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");

        let mut appender = daily_appender(&log_dir, DEFAULT_RETENTION_DAYS).unwrap();
        appender.write_all(b"catalog ready\n").unwrap();
        appender.flush().unwrap();

        let files: Vec<String> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("app."));
        assert!(files[0].ends_with(".log"));

        let contents = std::fs::read_to_string(log_dir.join(&files[0])).unwrap();
        assert_eq!(contents, "catalog ready\n");
    }

    #[test]
    fn test_zero_retention_keeps_one_file() {
        let dir = TempDir::new().unwrap();
        assert!(daily_appender(dir.path(), 0).is_ok());
    }
}
