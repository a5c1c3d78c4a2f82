use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "mentor.log";

/// Installs the global subscriber.
///
/// Logs always go to a daily rolling file under `log_dir`; `verbose` adds a
/// stderr layer. The filter comes from `MENTOR_LOG`, then `RUST_LOG`, then
/// defaults to `info`.
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init(log_dir: &Path, verbose: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env("MENTOR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = verbose.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let (file_layer, guard) = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("Could not create log directory {}: {}", log_dir.display(), e);
            (None, None)
        }
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    guard
}
