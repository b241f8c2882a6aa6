//! Log file setup.
//!
//! The terminal belongs to the UI, so records go to a file only.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the background writer alive; logs are flushed when dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("deptui")
}

/// Installs the global subscriber. Returns `None` when the log directory
/// cannot be created or a subscriber is already installed.
pub fn init(log_dir: Option<PathBuf>) -> Option<LoggingGuard> {
    let log_dir = log_dir.unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_name = format!("deptui-{:08x}.log", rand::random::<u32>());
    let log_file = log_dir.join(&file_name);
    let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deptui=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(panic = %panic_info, "panic");
        previous(panic_info);
    }));

    tracing::info!(log_file = %log_file.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}
