//! Core module for the calculator
//!
//! Arithmetic, the calculation history table and everything derived from it.
//! Nothing in here reads from the terminal; the shell and command handlers
//! sit on top.
//!
//! # Architecture
//!
//! - `error`: Error types using thiserror
//! - `operations`: The four arithmetic operations and the `Operation` tag
//! - `calculation`: A single calculation with its result
//! - `record`: Stored history rows and their CSV codec
//! - `history`: The `HistoryStore` table with CSV persistence
//! - `analytics`: Statistics, filters, histograms and pivots over history
//! - `export`: Spreadsheet export behind the `WorkbookWriter` seam
//! - `presenter`: Text rendering of tables, statistics and charts

pub mod error;
pub mod operations;
pub mod calculation;
pub mod record;
pub mod history;
pub mod analytics;
pub mod export;
pub mod presenter;

// Re-export commonly used types
pub use error::{CalcError, Result, ResultExt};
pub use operations::{parse_decimal, Operation};
pub use calculation::Calculation;
pub use record::CalculationRecord;
pub use history::{HistoryStore, DEFAULT_HISTORY_FILE};
pub use analytics::{
    Aggregate, Analytics, DateInput, Distribution, GroupKey, PivotRow, PivotTable,
    Statistics, Summary,
};
pub use export::{export_to_excel, CellValue, Sheet, WorkbookWriter, XlsxWorkbookWriter};
