//! Logging setup
//!
//! The console follows RUST_LOG:
//! - `RUST_LOG=debug` - everything
//! - `RUST_LOG=dockyard::plugin=debug` - plugin lifecycle only
//! - `RUST_LOG=message=debug` - every message through the update loop
//!
//! A second layer writes `<config dir>/logs/dockyard.log.<date>` at debug
//! level, rotated daily.

use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filters and destination of the two log layers
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Console directive when RUST_LOG is unset or invalid
    pub console_default: String,
    /// Directive for the log file
    pub file_directive: String,
    /// Log directory; `None` uses the config dir, falling back to console only
    pub log_dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            console_default: "warn".to_string(),
            file_directive: "debug".to_string(),
            log_dir: None,
        }
    }
}

impl LogSettings {
    fn console_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| self.filter(&self.console_default))
    }

    fn filter(&self, directive: &str) -> EnvFilter {
        EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("Warning: bad log directive '{}': {}", directive, e);
            EnvFilter::new("warn")
        })
    }

    fn resolve_log_dir(&self) -> Result<PathBuf, String> {
        match &self.log_dir {
            Some(dir) => std::fs::create_dir_all(dir)
                .map(|_| dir.clone())
                .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e)),
            None => crate::config_paths::ensure_logs_dir(),
        }
    }
}

/// Initialize logging with the default settings
pub fn init() {
    init_with(&LogSettings::default());
}

/// Install the console and file subscribers
///
/// Later calls are ignored once a global subscriber exists.
pub fn init_with(settings: &LogSettings) {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(settings.console_filter());

    let file_layer = match settings.resolve_log_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, crate::config_paths::LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(settings.filter(&settings.file_directive)),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    if tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_log_dir_is_created() {
        let dir = TempDir::new().unwrap();
        let settings = LogSettings {
            log_dir: Some(dir.path().join("nested").join("logs")),
            ..LogSettings::default()
        };
        let resolved = settings.resolve_log_dir().unwrap();
        assert!(resolved.is_dir());
    }

    #[test]
    fn test_bad_directive_falls_back() {
        let settings = LogSettings::default();
        assert_eq!(settings.filter("dockyard=loud").to_string(), "warn");
        assert_eq!(settings.filter("dockyard=debug").to_string(), "dockyard=debug");
    }
}
