//! `export_excel`

use std::path::PathBuf;

use tracing::error;

use crate::commands::{Command, CommandRegistry};
use crate::core::error::Result;
use crate::core::export::export_to_excel;
use crate::shell::AppContext;

/// Workbook filename used when none is entered.
pub const DEFAULT_WORKBOOK: &str = "calculation_history.xlsx";

/// Append `.xlsx` unless the path already ends with it.
pub fn with_xlsx_extension(path: &str) -> PathBuf {
    if path.to_lowercase().ends_with(".xlsx") {
        PathBuf::from(path)
    } else {
        PathBuf::from(format!("{}.xlsx", path))
    }
}

/// Writes the history, statistics and pivot sheets to a workbook.
pub struct ExportExcelCommand;

impl Command for ExportExcelCommand {
    fn name(&self) -> &'static str {
        "export_excel"
    }

    fn description(&self) -> &'static str {
        "Export calculation history to an Excel workbook"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        if ctx.history.is_empty() {
            return ctx
                .console
                .println("No calculation history available to export.");
        }

        let default_path = std::env::current_dir()?.join(DEFAULT_WORKBOOK);
        let answer = ctx.console.ask(&format!(
            "Enter file path to save Excel file [default: {}]: ",
            default_path.display()
        ))?;
        let answer = answer.trim();
        let path = if answer.is_empty() {
            default_path
        } else {
            with_xlsx_extension(answer)
        };

        ctx.console.println("Exporting calculation history to Excel...")?;
        let saved = match export_to_excel(&ctx.history, &path, ctx.workbook_writer.as_ref()) {
            Ok(saved) => saved,
            Err(e) => {
                error!(path = %path.display(), error = %e, "export failed");
                return ctx.console.println(format!("Error exporting to Excel: {}", e));
            }
        };

        ctx.console.println(format!(
            "Calculation history exported to Excel file: {}",
            saved.display()
        ))?;
        ctx.console.println(
            "The Excel file contains the following sheets:\n  \
             - History: All calculation records\n  \
             - Statistics: Statistical summary by operation\n  \
             - Pivot: Pivot table of results by operation",
        )?;
        ctx.console.println("History exported successfully!")
    }
}

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(Box::new(ExportExcelCommand))
}
