//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise the filter is built from the given
//! level. Output goes to stdout, or to a daily rolling file when the log
//! directory exists.

use std::path::Path;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "orgchart_server={level},shared={level},tower_http={level}";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES.replace("{level}", level)))
}

/// Initialize the logger with optional JSON format and file output
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let json = json.unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "orgchart-server");
            let builder = builder.with_writer(file_appender).with_ansi(false);
            let _ = if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };
            return;
        }
    }

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_mentions_crate() {
        let directives = DEFAULT_DIRECTIVES.replace("{level}", "debug");
        assert!(directives.contains("orgchart_server=debug"));
        assert!(directives.contains("tower_http=debug"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger_with_file(Some("warn"), None, None);
        init_logger();
    }
}
