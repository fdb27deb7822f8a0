//! Logging infrastructure.
//!
//! - `tracing` for library diagnostics, with subscriber setup helpers
//! - [`BatchLogger`]: the human-readable batch log (file + callback), with
//!   compact progress filtering and a tail buffer of engine output
//!
//! ```no_run
//! use vsg_batch::logging::{BatchLogger, LogConfig};
//!
//! let logger = BatchLogger::new("/path/to/logs", "batch_20240101", LogConfig::default(), None)
//!     .unwrap();
//! logger.phase("Job 1/3: Episode 01");
//! logger.progress(40);
//! logger.success("Output: /out/Episode 01.mkv");
//! ```

mod batch_logger;
mod types;

pub use batch_logger::BatchLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber: stderr output, `RUST_LOG` respected,
/// `default_level` otherwise.
///
/// Call once at startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Like [`init_tracing`], plus a daily-rolling `vsg_batch.log` in `log_dir`.
///
/// Keep the returned guard alive for the lifetime of the program, dropping it
/// flushes the background writer.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    log_dir: impl AsRef<Path>,
) -> tracing_appender::non_blocking::WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    let appender = tracing_appender::rolling::daily(log_dir.as_ref(), "vsg_batch.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(filter)
        .init();

    guard
}

/// Initialize tracing for tests (warnings and above, captured output).
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
    fn level_to_filter_works() {
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert_eq!(LogLevel::Info.as_filter_str(), "info");
    }
}
