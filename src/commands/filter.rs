//! `filter_history`

use chrono::{Duration, Local};
use tracing::{error, info};

use crate::commands::{Command, CommandRegistry};
use crate::core::analytics::DateInput;
use crate::core::error::{CalcError, Result};
use crate::core::operations::parse_decimal;
use crate::core::presenter::render_history_table;
use crate::core::record::CalculationRecord;
use crate::shell::AppContext;

/// Rows shown before the listing is cut short.
pub const DISPLAY_LIMIT: usize = 10;

/// Days covered by the default date range.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// Filters history by date range, result range or operation.
pub struct FilterHistoryCommand;

impl FilterHistoryCommand {
    fn by_date(&self, ctx: &mut AppContext) -> Result<Option<Vec<CalculationRecord>>> {
        ctx.console.println("\nFilter by date range:")?;

        let records = ctx.history.get_history();
        if let (Some(first), Some(last)) = (
            records.iter().map(|r| r.timestamp).min(),
            records.iter().map(|r| r.timestamp).max(),
        ) {
            let range = format!(
                "Available date range: \nFrom {} to {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            );
            ctx.console.println(range)?;
        }

        let today = Local::now().date_naive();
        let default_start = (today - Duration::days(DEFAULT_RANGE_DAYS)).format("%Y-%m-%d").to_string();
        let default_end = today.format("%Y-%m-%d").to_string();

        let start = ask_or(ctx, "Enter start date (YYYY-MM-DD)", &default_start)?;
        let end = ask_or(ctx, "Enter end date (YYYY-MM-DD)", &default_end)?;

        let filtered = ctx.history.analytics().filter_by_date_range(
            Some(DateInput::from(start.as_str())),
            Some(DateInput::from(end.as_str())),
        )?;
        info!(%start, %end, matched = filtered.len(), "filtered history by date range");
        Ok(Some(filtered))
    }

    fn by_result(&self, ctx: &mut AppContext) -> Result<Option<Vec<CalculationRecord>>> {
        ctx.console.println("\nFilter by result range:")?;

        let records = ctx.history.get_history();
        let (Some(low), Some(high)) = (
            records.iter().map(|r| r.result).min(),
            records.iter().map(|r| r.result).max(),
        ) else {
            return Ok(Some(Vec::new()));
        };
        ctx.console
            .println(format!("Available result range: {} to {}", low, high))?;

        let min = parse_decimal(&ask_or(ctx, "Enter minimum result", &low.to_string())?)?;
        let max = parse_decimal(&ask_or(ctx, "Enter maximum result", &high.to_string())?)?;

        let filtered = ctx
            .history
            .analytics()
            .filter_by_result_range(Some(min), Some(max));
        info!(%min, %max, matched = filtered.len(), "filtered history by result range");
        Ok(Some(filtered))
    }

    fn by_operation(&self, ctx: &mut AppContext) -> Result<Option<Vec<CalculationRecord>>> {
        ctx.console.println("\nFilter by operation type:")?;

        let operations = ctx.history.analytics().operations_present();
        let listing: Vec<String> = operations
            .iter()
            .enumerate()
            .map(|(i, op)| format!("{}. {}", i + 1, op))
            .collect();
        ctx.console.println(listing.join("\n"))?;

        let answer = ctx.console.ask("Enter operation number: ")?;
        let Ok(choice) = answer.trim().parse::<usize>() else {
            ctx.console.println("Invalid input. Please enter a number.")?;
            return Ok(None);
        };
        let Some(operation) = choice.checked_sub(1).and_then(|i| operations.get(i)) else {
            ctx.console.println("Invalid operation number.")?;
            return Ok(None);
        };

        let filtered = ctx.history.find_by_operation(operation.name());
        info!(%operation, matched = filtered.len(), "filtered history by operation");
        Ok(Some(filtered))
    }

    fn show(&self, ctx: &mut AppContext, records: &[CalculationRecord]) -> Result<()> {
        if records.is_empty() {
            return ctx.console.println("No calculations match the filter criteria.");
        }

        ctx.console
            .println(format!("\nFound {} matching calculations:", records.len()))?;
        let shown = &records[..records.len().min(DISPLAY_LIMIT)];
        ctx.console.println(render_history_table(shown))?;
        if records.len() > DISPLAY_LIMIT {
            ctx.console.println(format!(
                "\n(Showing first {} of {} results)",
                DISPLAY_LIMIT,
                records.len()
            ))?;
        }
        Ok(())
    }
}

/// Prompt showing a default that an empty answer accepts.
fn ask_or(ctx: &mut AppContext, label: &str, default: &str) -> Result<String> {
    let answer = ctx.console.ask(&format!("{} [default: {}]: ", label, default))?;
    let answer = answer.trim();
    Ok(if answer.is_empty() { default } else { answer }.to_string())
}

impl Command for FilterHistoryCommand {
    fn name(&self) -> &'static str {
        "filter_history"
    }

    fn description(&self) -> &'static str {
        "Filter calculation history"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        if ctx.history.is_empty() {
            return ctx
                .console
                .println("No calculation history available to filter.");
        }

        ctx.console.println(
            "\n===== Filter Calculation History =====\n\
             1. Filter by date range\n\
             2. Filter by result range\n\
             3. Filter by operation type\n\
             0. Cancel",
        )?;
        let choice = ctx.console.ask("\nEnter your choice (0-3): ")?;

        let outcome = match choice.trim() {
            "0" => return Ok(()),
            "1" => self.by_date(ctx),
            "2" => self.by_result(ctx),
            "3" => self.by_operation(ctx),
            _ => return ctx.console.println("Invalid choice."),
        };

        match outcome {
            Ok(Some(records)) => self.show(ctx, &records),
            Ok(None) => Ok(()),
            Err(e @ (CalcError::InvalidDate { .. } | CalcError::InvalidInput { .. })) => {
                error!(error = %e, "filter input rejected");
                ctx.console.println(format!("Error filtering history: {}", e))
            }
            Err(e) => Err(e),
        }
    }
}

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(Box::new(FilterHistoryCommand))
}
