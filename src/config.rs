//! Application configuration
//!
//! Layered, later wins: built-in defaults, then a JSON file
//! (`CALCULATOR_CONFIG`, or `calculator.json` in the working directory),
//! then `CALCULATOR_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{CalcError, Result};
use crate::core::history::DEFAULT_HISTORY_FILE;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CALCULATOR_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "calculator.json";

const ENV_DATA_DIR: &str = "CALCULATOR_DATA_DIR";
const ENV_HISTORY_FILE: &str = "CALCULATOR_HISTORY_FILE";
const ENV_LOG_LEVEL: &str = "CALCULATOR_LOG_LEVEL";
const ENV_LOG_DEST: &str = "CALCULATOR_LOG_DEST";
const ENV_LOG_FILE: &str = "CALCULATOR_LOG_FILE";

/// Where log events go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogDestination {
    /// Append to the configured log file
    #[default]
    File,
    /// Write to stderr
    Console,
    /// Discard
    Off,
}

impl LogDestination {
    /// Parse a destination name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Some(LogDestination::File),
            "console" | "stderr" => Some(LogDestination::Console),
            "off" | "none" => Some(LogDestination::Off),
            _ => None,
        }
    }
}

/// Logging section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `calculator=debug`
    pub level: String,
    pub destination: LogDestination,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            destination: LogDestination::File,
            file: PathBuf::from("logs").join("calculator.log"),
        }
    }
}

/// Configuration loaded from `calculator.json` and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the default history file
    pub data_dir: PathBuf,
    /// History file used when no path is given; `<data_dir>/calculation_history.csv` if unset
    pub history_file: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment and working directory.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_with(&cwd, |key| std::env::var(key).ok())
    }

    /// Load with an explicit working directory and environment lookup.
    pub fn load_with<F>(cwd: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match env(CONFIG_ENV).filter(|p| !p.trim().is_empty()) {
            Some(explicit) => Self::from_file(Path::new(&explicit))?,
            None => {
                let implicit = cwd.join(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(env)?;
        Ok(config)
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalcError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            CalcError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = set(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = set(ENV_HISTORY_FILE) {
            self.history_file = Some(PathBuf::from(file));
        }
        if let Some(level) = set(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(dest) = set(ENV_LOG_DEST) {
            self.logging.destination = LogDestination::parse(&dest).ok_or_else(|| {
                CalcError::config(format!("{} must be file, console or off, got '{}'", ENV_LOG_DEST, dest))
            })?;
        }
        if let Some(file) = set(ENV_LOG_FILE) {
            self.logging.file = PathBuf::from(file);
        }
        Ok(())
    }

    /// Resolved default history file.
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_HISTORY_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_with(dir.path(), env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.history_path(), PathBuf::from("data").join("calculation_history.csv"));
        assert_eq!(config.logging.destination, LogDestination::File);
    }

    #[test]
    fn test_implicit_file_in_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{"data_dir": "store", "logging": {"level": "debug"}}"#,
        )
        .unwrap();

        let config = AppConfig::load_with(dir.path(), env(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("store"));
        assert_eq!(config.logging.level, "debug");
        // unspecified fields keep their defaults
        assert_eq!(config.logging.file, PathBuf::from("logs").join("calculator.log"));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("custom.json");
        std::fs::write(&file, r#"{"data_dir": "from_file"}"#).unwrap();

        let config = AppConfig::load_with(
            dir.path(),
            env(&[
                (CONFIG_ENV, file.to_str().unwrap()),
                (ENV_DATA_DIR, "from_env"),
                (ENV_LOG_DEST, "Console"),
            ]),
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("from_env"));
        assert_eq!(config.logging.destination, LogDestination::Console);
    }

    #[test]
    fn test_history_file_override() {
        let dir = TempDir::new().unwrap();
        let config =
            AppConfig::load_with(dir.path(), env(&[(ENV_HISTORY_FILE, "/tmp/h.csv")])).unwrap();
        assert_eq!(config.history_path(), PathBuf::from("/tmp/h.csv"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let err = AppConfig::load_with(dir.path(), env(&[(CONFIG_ENV, missing.to_str().unwrap())]))
            .unwrap_err();
        assert!(matches!(err, CalcError::Config { .. }));
    }

    #[test]
    fn test_bad_json_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{not json").unwrap();
        let err = AppConfig::load_with(dir.path(), env(&[])).unwrap_err();
        assert!(matches!(err, CalcError::Config { .. }));
    }

    #[test]
    fn test_bad_log_destination_is_error() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::load_with(dir.path(), env(&[(ENV_LOG_DEST, "syslog")])).unwrap_err();
        assert!(matches!(err, CalcError::Config { .. }));
    }
}
