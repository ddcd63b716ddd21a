/// Log setup for the terminal viewer
///
/// The terminal itself is the drawing surface, so log records go to a file.
use objview_core::config::LoggingConfig;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logger(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let path = Path::new(&config.file);
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("objview.log");

    let file_appender = RollingFileAppender::new(Rotation::NEVER, directory, filename);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
