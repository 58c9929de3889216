//! Error types for the calculator
//!
//! This module provides structured error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for calculator operations
pub type Result<T> = std::result::Result<T, CalcError>;

/// Errors that can occur while calculating, recording, or analysing history
#[derive(Error, Debug)]
pub enum CalcError {
    /// Operand text that is not a decimal number
    #[error("Invalid number: {input}")]
    InvalidInput { input: String },

    /// Divisor of zero on divide
    #[error("Division by zero")]
    DivisionByZero,

    /// Result does not fit in a decimal
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    /// Operation name outside add/subtract/multiply/divide
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// Command name with no registered handler
    #[error("No such command: {name}")]
    UnknownCommand { name: String },

    /// Second registration under an existing command name
    #[error("Command already registered: {name}")]
    DuplicateCommand { name: String },

    /// Argument outside the accepted domain
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Date text that cannot be normalized
    #[error("Invalid date: {input}")]
    InvalidDate { input: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A history row with a bad field
    #[error("Malformed history row {line}: {message}")]
    MalformedRow { line: u64, message: String },

    /// Spreadsheet generation error
    #[error("Export error: {message}")]
    Export { message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CalcError>,
    },
}

impl CalcError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CalcError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(input: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            input: input.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CalcError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(message: impl Into<String>) -> Self {
        CalcError::Config {
            message: message.into(),
        }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        CalcError::Export {
            message: message.into(),
        }
    }

    /// The innermost error, looking through any context wrappers
    pub fn root(&self) -> &CalcError {
        match self {
            CalcError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for CalcError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        CalcError::export(err.to_string())
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CalcError::FileNotFound {
            path: PathBuf::from("/tmp/missing.csv"),
        };
        assert!(err.to_string().contains("/tmp/missing.csv"));
    }

    #[test]
    fn test_error_with_context() {
        let err = CalcError::invalid_argument("bins must be positive");
        let wrapped = err.with_context("building distribution");
        assert!(wrapped.to_string().contains("building distribution"));
        assert!(wrapped.to_string().contains("bins must be positive"));
    }

    #[test]
    fn test_root_looks_through_context() {
        let err = CalcError::DivisionByZero
            .with_context("inner")
            .with_context("outer");
        assert!(matches!(err.root(), CalcError::DivisionByZero));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CalcError = io_err.into();
        assert!(matches!(err, CalcError::Io(_)));
    }

    #[test]
    fn test_invalid_input_helper() {
        let err = CalcError::invalid_input("abc");
        assert_eq!(err.to_string(), "Invalid number: abc");
    }

    #[test]
    fn test_unknown_and_duplicate_command() {
        let err = CalcError::UnknownCommand {
            name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "No such command: foo");

        let err = CalcError::DuplicateCommand {
            name: "add".to_string(),
        };
        assert!(err.to_string().contains("add"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(CalcError::config("test"));
        let err = result.context("during startup").unwrap_err();
        assert!(err.to_string().contains("during startup"));
    }

    #[test]
    fn test_malformed_row_mentions_line() {
        let err = CalcError::MalformedRow {
            line: 7,
            message: "bad timestamp".to_string(),
        };
        assert!(err.to_string().contains('7'));
        assert!(err.to_string().contains("bad timestamp"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: CalcError = json_err.into();
        assert!(matches!(err, CalcError::Json(_)));
    }
}
