//! calculator - Arithmetic with a recorded, analysable history
//!
//! This library provides the calculator's logic: exact decimal arithmetic,
//! the calculation history table with CSV persistence, analytics and
//! spreadsheet export over that history, and the command registry driving
//! the interactive shell.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic, no process concerns
//! - **bin/calc.rs**: Thin wrapper that parses arguments and calls the library
//!
//! # Example
//!
//! ```
//! use calculator::{Calculation, HistoryStore, Operation};
//! use rust_decimal::Decimal;
//!
//! let mut history = HistoryStore::default();
//! let calc = Calculation::new(Decimal::from(10), Decimal::from(4), Operation::Divide).unwrap();
//! history.add_calculation(&calc);
//!
//! let stats = history.analytics().get_statistics();
//! assert_eq!(stats.overall.unwrap().count, 1);
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod logging;
pub mod shell;

pub use crate::core::{
    Aggregate, Analytics, CalcError, Calculation, CalculationRecord, DateInput, Distribution,
    HistoryStore, Operation, PivotTable, Result, Statistics, Summary,
};
pub use commands::{Command, CommandRegistry};
pub use config::AppConfig;
pub use shell::{AppContext, Console, Shell};

/// Crate version, as reported by `calc --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a shell over stdin/stdout with the builtin commands and run it.
pub fn run_interactive(config: AppConfig) -> Result<()> {
    let registry = CommandRegistry::with_builtins()?;
    let ctx = AppContext::new(config, Console::stdio());
    Shell::new(registry, ctx).run()
}
