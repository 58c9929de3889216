//! Spreadsheet export
//!
//! Builds the History, Statistics and Pivot sheets from a history snapshot
//! and hands them to a [`WorkbookWriter`]. The xlsx encoding lives behind
//! that trait so that sheet construction can be tested without touching
//! the filesystem.

use std::path::{Path, PathBuf};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

#[cfg(test)]
use mockall::automock;

use crate::core::analytics::{Aggregate, Analytics, Summary};
use crate::core::error::{CalcError, Result};
use crate::core::history::HistoryStore;
use crate::core::record::DISPLAY_TIMESTAMP_FORMAT;

/// Sheet names in workbook order.
pub const SHEET_NAMES: [&str; 3] = ["History", "Statistics", "Pivot"];

// =============================================================================
// Sheet Model
// =============================================================================

/// One cell of an exported sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Number(Decimal),
    Empty,
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Number(value)
    }
}

impl From<Option<Decimal>> for CellValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Number)
    }
}

/// A named table with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

// =============================================================================
// Writer Seam
// =============================================================================

/// Encodes sheets into a workbook file.
#[cfg_attr(test, automock)]
pub trait WorkbookWriter {
    fn write_workbook(&self, path: &Path, sheets: &[Sheet]) -> Result<()>;
}

/// [`WorkbookWriter`] producing `.xlsx` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWorkbookWriter;

impl WorkbookWriter for XlsxWorkbookWriter {
    fn write_workbook(&self, path: &Path, sheets: &[Sheet]) -> Result<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        for sheet in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            for (col, title) in sheet.columns.iter().enumerate() {
                worksheet.write_string_with_format(0, column_index(col)?, title, &header)?;
            }

            for (row, cells) in sheet.rows.iter().enumerate() {
                let row = u32::try_from(row + 1)
                    .map_err(|_| CalcError::export("too many rows for a worksheet"))?;
                for (col, cell) in cells.iter().enumerate() {
                    let col = column_index(col)?;
                    match cell {
                        CellValue::Text(text) => {
                            worksheet.write_string(row, col, text)?;
                        }
                        CellValue::Number(number) => {
                            let number = number
                                .to_f64()
                                .ok_or_else(|| CalcError::export(format!("unrepresentable number {}", number)))?;
                            worksheet.write_number(row, col, number)?;
                        }
                        CellValue::Empty => {}
                    }
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| CalcError::export("too many columns for a worksheet"))
}

// =============================================================================
// Sheet Construction
// =============================================================================

const SUMMARY_COLUMNS: [&str; 6] = ["operation", "count", "mean", "min", "max", "std"];

fn summary_row(label: &str, summary: &Summary) -> Vec<CellValue> {
    let mut row = vec![CellValue::from(label)];
    row.extend(
        Aggregate::SUMMARY
            .iter()
            .map(|&aggregate| CellValue::from(summary.aggregate(aggregate))),
    );
    row
}

/// The raw history table.
pub fn history_sheet(analytics: &Analytics<'_>) -> Sheet {
    let mut sheet = Sheet::new(SHEET_NAMES[0], &["timestamp", "a", "b", "operation", "result"]);
    for record in analytics.records() {
        sheet.rows.push(vec![
            CellValue::Text(record.timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string()),
            record.operand_a.into(),
            record.operand_b.into(),
            record.operation.name().into(),
            record.result.into(),
        ]);
    }
    sheet
}

/// Overall and per-operation statistics of results.
pub fn statistics_sheet(analytics: &Analytics<'_>) -> Sheet {
    let statistics = analytics.get_statistics();
    let mut sheet = Sheet::new(SHEET_NAMES[1], &SUMMARY_COLUMNS);

    if let Some(overall) = &statistics.overall {
        sheet.rows.push(summary_row("overall", overall));
    }
    for (operation, summary) in &statistics.by_operation {
        sheet.rows.push(summary_row(operation.name(), summary));
    }
    sheet
}

/// Results aggregated per operation.
pub fn pivot_sheet(analytics: &Analytics<'_>) -> Sheet {
    let table = analytics.pivot("operation", "result", &Aggregate::SUMMARY);
    let mut sheet = Sheet::new(SHEET_NAMES[2], &SUMMARY_COLUMNS);

    for row in table.rows {
        let mut cells = vec![CellValue::Text(row.key.to_string())];
        cells.extend(row.values.into_iter().map(CellValue::from));
        sheet.rows.push(cells);
    }
    sheet
}

/// Write the History, Statistics and Pivot sheets for `store` to `path`.
pub fn export_to_excel(
    store: &HistoryStore,
    path: &Path,
    writer: &dyn WorkbookWriter,
) -> Result<PathBuf> {
    let analytics = store.analytics();
    let sheets = [
        history_sheet(&analytics),
        statistics_sheet(&analytics),
        pivot_sheet(&analytics),
    ];

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    writer
        .write_workbook(path, &sheets)
        .map_err(|e| e.with_context(format!("Failed to export to {}", path.display())))?;

    info!(path = %path.display(), records = store.len(), "exported history workbook");
    Ok(path.to_path_buf())
}
