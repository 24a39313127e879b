use crate::config::{AppConfig, Rotation};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// Diagnostics always go to stderr so stdout stays clean for CSV rows,
/// tables and snapshots. A log file is added when both `log_dir` and
/// `log_file` are configured; keep the returned guard alive until exit or
/// buffered file lines are lost.
pub fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    let (file_writer, guard) = match (&config.log_dir, &config.log_file) {
        (Some(dir), Some(file)) => {
            let appender = match config.rotation {
                Rotation::Hourly => tracing_appender::rolling::hourly(dir, file),
                Rotation::Daily => tracing_appender::rolling::daily(dir, file),
                Rotation::Never => tracing_appender::rolling::never(dir, file),
            };
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (Some(non_blocking), Some(guard))
        }
        _ => (None, None),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let stderr_layer = fmt::layer()
            .json()
            .with_target(true) // Keep target in JSON for structured queries
            .with_writer(std::io::stderr);
        let file_layer = file_writer.map(|w| {
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(w)
                .with_ansi(false)
        });
        registry.with(stderr_layer).with(file_layer).init();
    } else {
        let stderr_layer = fmt::layer()
            .with_target(false) // Hide redundant target in text output
            .with_writer(std::io::stderr);
        let file_layer = file_writer.map(|w| {
            fmt::layer()
                .with_target(false)
                .with_writer(w)
                .with_ansi(false)
        });
        registry.with(stderr_layer).with(file_layer).init();
    }

    guard
}
