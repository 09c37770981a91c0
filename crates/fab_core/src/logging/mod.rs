//! Logging infrastructure for the file acquisition bridge.
//!
//! Everything logs through `tracing`. This module installs the global
//! subscriber:
//! - `RUST_LOG` overrides the configured level
//! - stderr output, plus an optional daily log file on native targets
//! - a caller-supplied writer for hosts without stderr (the browser console)

mod types;

pub use types::LogLevel;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` if set, otherwise everything at or above `default_level`.
fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from(default_level).into())
        .from_env_lossy()
}

/// Initialize global tracing subscriber writing to stderr.
///
/// Should be called once at application startup. Later calls are no-ops.
pub fn init_tracing(default_level: LogLevel) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_level))
        .try_init();
}

/// Initialize tracing with stderr output and a daily rolling log file.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the lifetime of the program.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_tracing_with_file(
    default_level: LogLevel,
    logs_dir: &std::path::Path,
) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;

    let appender = tracing_appender::rolling::daily(logs_dir, "fab.log");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(env_filter(default_level))
        .try_init();

    Ok(guard)
}

/// Initialize tracing with a custom writer and no timestamps.
///
/// Used where there is no system clock or stderr, such as wasm hosts.
pub fn init_tracing_with_writer<W>(default_level: LogLevel, writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .without_time()
                .with_target(true)
                .with_writer(writer),
        )
        .with(env_filter(default_level))
        .try_init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_converts_for_tracing() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn level_reads_lowercase_from_settings() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            level: LogLevel,
        }
        let parsed: Wrapper = toml::from_str("level = \"trace\"").unwrap();
        assert_eq!(parsed.level, LogLevel::Trace);
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
    }

    #[test]
    fn file_logging_creates_logs_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let _guard = init_tracing_with_file(LogLevel::Info, &logs).unwrap();
        assert!(logs.is_dir());
    }
}
