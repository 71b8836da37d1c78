//! Tracing setup. The terminal belongs to the UI, so logs only ever go to a file.

use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_FILTER_ENV: &str = "DEPSWEEP_LOG";
/// Environment variable naming the log file when `--log-file` is absent
pub const LOG_FILE_ENV: &str = "DEPSWEEP_LOG_FILE";

/// Picks the log file: the CLI flag first, then the environment
pub fn resolve_log_file(cli: Option<&Path>) -> Option<PathBuf> {
    cli.map(Path::to_path_buf)
        .or_else(|| env::var_os(LOG_FILE_ENV).map(PathBuf::from))
}

/// Builds the filter: `DEPSWEEP_LOG`, then the configured level, then `info`
pub fn build_filter(configured: Option<&str>) -> EnvFilter {
    let directive = env::var(LOG_FILTER_ENV)
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| "info".to_string());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a file logger. Returns `None` when logging is disabled.
///
/// The returned guard flushes buffered lines on drop and must be held for the whole run.
pub fn init_logger(log_file: Option<&Path>, configured_level: Option<&str>) -> Option<WorkerGuard> {
    let path = resolve_log_file(log_file)?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name()?.to_os_string();

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .with(build_filter(configured_level))
        .try_init();

    if installed.is_err() {
        return None;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "logging to {}", path.display());
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_log_file_wins() {
        let path = resolve_log_file(Some(Path::new("/tmp/depsweep.log")));
        assert_eq!(path, Some(PathBuf::from("/tmp/depsweep.log")));
    }

    #[test]
    fn test_build_filter_accepts_configured_level() {
        if env::var(LOG_FILTER_ENV).is_ok() {
            return;
        }
        let filter = build_filter(Some("debug"));
        assert_eq!(filter.to_string(), "debug");
    }
}
