//! Subscriber setup for the `scholar-irt` binary.
//!
//! Events go to stderr so stdout stays reserved for the JSON report. With a
//! log directory configured, a daily rolling file receives the same events.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Result;

const CRATE_TARGET: &str = "scholar_irt";
const LOG_FILE_PREFIX: &str = "scholar-irt.log";

/// Flushes the rolling file writer when dropped
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Expand a bare level into crate-scoped directives.
///
/// `debug` becomes `scholar_irt=debug,warn`, so dependencies stay at `warn`.
/// Strings that already carry directives pass through unchanged.
pub fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.is_empty() {
        return format!("{CRATE_TARGET}=info,warn");
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("{CRATE_TARGET}={level},warn")
}

/// Install the global subscriber.
///
/// Fails only when `log_dir` cannot be created. Keep the returned guard alive
/// for the life of the process.
pub fn init_tracing(log_level: &str, log_dir: Option<&Path>) -> Result<LogGuard> {
    let filter = EnvFilter::try_new(filter_directives(log_level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("info")));
    let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(LogGuard { _file: file_guard })
}
