//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogDestination, LoggingConfig};
use crate::core::error::{CalcError, Result};

/// Build the event filter for a configured level directive.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| CalcError::config(format!("invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber described by `config`.
///
/// Returns `false` when logging is off or a subscriber was already
/// installed.
pub fn init(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(&config.level)?;

    let installed = match config.destination {
        LogDestination::Off => return Ok(false),
        LogDestination::Console => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
        LogDestination::File => {
            if let Some(parent) = config.file.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.file)?;

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
                .is_ok()
        }
    };

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("calculator=debug,warn").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        let err = build_filter("calculator=notalevel").unwrap_err();
        assert!(matches!(err, CalcError::Config { .. }));
    }

    #[test]
    fn test_off_installs_nothing() {
        let config = LoggingConfig {
            destination: LogDestination::Off,
            ..LoggingConfig::default()
        };
        assert!(!init(&config).unwrap());
    }

    #[test]
    fn test_file_destination_creates_log_directory() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            destination: LogDestination::File,
            file: dir.path().join("logs").join("calculator.log"),
            ..LoggingConfig::default()
        };
        // another test may already own the global subscriber
        init(&config).unwrap();
        assert!(config.file.exists());
    }
}
