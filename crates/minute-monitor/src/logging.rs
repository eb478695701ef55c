//! Logging setup.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the file writer flushing until dropped.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Setup logging with the given level.
pub fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

/// Setup logging to stdout and, when `file` is given, to a daily-rotated
/// file next to it. Hold the returned guard for the life of the process.
pub fn setup_logging_with_file(level: &str, json: bool, file: Option<&Path>) -> LogGuard {
    let Some(path) = file else {
        setup_logging(level, json);
        return LogGuard { _guard: None };
    };

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "minute.log".to_string());
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, &prefix));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // The file layer's subscriber type differs per stdout format.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .with(fmt::layer().json().with_ansi(false).with_writer(writer))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .with(fmt::layer().json().with_ansi(false).with_writer(writer))
            .init();
    }

    LogGuard {
        _guard: Some(guard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_with_file_writes_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minute.log");

        let guard = setup_logging_with_file("debug", false, Some(path.as_path()));
        tracing::info!(target: "minute_monitor", "file logging smoke test");
        drop(guard);

        let created: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert!(created.iter().any(|name| name.starts_with("minute.log")));
    }
}
