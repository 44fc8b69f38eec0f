//! Logging Infrastructure
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "menu-server";

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logger with optional JSON format and daily file output
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let filter = env_filter(log_level.unwrap_or("info"));
    let json = json.unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // File output only if the directory exists or can be created
    let file_appender = log_dir.and_then(|dir| {
        let path = Path::new(dir);
        if !path.exists() && std::fs::create_dir_all(path).is_err() {
            return None;
        }
        Some(tracing_appender::rolling::daily(path, LOG_FILE_PREFIX))
    });

    match (file_appender, json) {
        (Some(appender), true) => builder.json().with_writer(appender).init(),
        (Some(appender), false) => builder.with_ansi(false).with_writer(appender).init(),
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }
}
