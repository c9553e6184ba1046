//! Logging
//!
//! Plain-text tracing output to stdout, or to daily rolling files under
//! `LOG_DIR`. `RUST_LOG` takes precedence over `LOG_LEVEL`; both accept
//! full filter directives such as `info,tower_http=debug`.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// File name prefix of rolled log files
const LOG_FILE_PREFIX: &str = "print-server";

/// Initialize logging, writing to `log_dir` when it names a directory
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_dir.map(Path::new) {
        Some(dir) if dir.is_dir() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            builder.with_ansi(false).with_writer(appender).init();
        }
        Some(dir) => {
            builder.init();
            tracing::warn!(
                log_dir = %dir.display(),
                "LOG_DIR is not a directory, logging to stdout"
            );
        }
        None => builder.init(),
    }
}
