//! Logging Infrastructure
//!
//! Structured logging setup. The engine itself only emits `tracing` events;
//! the embedding application decides whether to install a subscriber.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::core::EngineConfig;

/// Initialize the logger at `info` (or `RUST_LOG` if set)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger at the level in `config` (`LOG_LEVEL`)
pub fn init_logger_from_config(config: &EngineConfig) {
    init_logger_with_file(Some(&config.log_level), None);
}

/// Initialize the logger with an optional level and optional daily-rolling file output
///
/// An explicit `log_level` wins over `RUST_LOG`. Calling this twice is a no-op
/// for the second call.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = level_filter(log_level);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "salon-engine");
            let _ = subscriber.with_writer(file_appender).try_init();
            return;
        }
    }

    let _ = subscriber.try_init();
}

fn level_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) if !level.trim().is_empty() => EnvFilter::new(level.trim()),
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_drives_the_filter() {
        let config = EngineConfig {
            log_level: "debug".to_string(),
            ..EngineConfig::default()
        };
        assert_eq!(level_filter(Some(&config.log_level)).to_string(), "debug");
        assert_eq!(level_filter(Some(" warn ")).to_string(), "warn");
    }

    #[test]
    fn test_init_from_config_twice() {
        let config = EngineConfig::default();
        init_logger_from_config(&config);
        init_logger_from_config(&config);
        tracing::info!("logger initialized");
    }
}
