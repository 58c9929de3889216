//! `history` and `clear_history`

use tracing::info;

use crate::commands::{confirmed, Command, CommandRegistry};
use crate::core::error::Result;
use crate::core::presenter::render_history_table;
use crate::shell::AppContext;

/// Prints the whole history table.
pub struct HistoryCommand;

impl Command for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn description(&self) -> &'static str {
        "Show calculation history"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        if ctx.history.is_empty() {
            return ctx.console.println("No calculation history available.");
        }
        let table = render_history_table(ctx.history.get_history());
        ctx.console.println("\nCalculation History:")?;
        ctx.console.println(table)
    }
}

/// Empties the history table after a y/n confirmation.
pub struct ClearHistoryCommand;

impl Command for ClearHistoryCommand {
    fn name(&self) -> &'static str {
        "clear_history"
    }

    fn description(&self) -> &'static str {
        "Clear calculation history"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let answer = ctx
            .console
            .ask("Are you sure you want to clear the calculation history? (y/n): ")?;
        if !confirmed(&answer) {
            return ctx.console.println("Operation cancelled.");
        }

        ctx.history.clear_history();
        info!("history cleared from shell");
        ctx.console.println("History cleared successfully.")
    }
}

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(Box::new(HistoryCommand))?;
    registry.register(Box::new(ClearHistoryCommand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::calculation::Calculation;
    use crate::core::operations::Operation;
    use crate::shell::Console;
    use rust_decimal_macros::dec;

    fn context(script: &str) -> (AppContext, crate::shell::CapturedOutput) {
        let (console, output) = Console::scripted(script);
        let mut ctx = AppContext::new(AppConfig::default(), console);
        ctx.history
            .add_calculation(&Calculation::new(dec!(3), dec!(4), Operation::Multiply).unwrap());
        (ctx, output)
    }

    #[test]
    fn test_history_prints_table() {
        let (mut ctx, output) = context("");
        HistoryCommand.execute(&mut ctx).unwrap();
        let text = output.contents();
        assert!(text.contains("Calculation History:"));
        assert!(text.contains("multiply"));
        assert!(text.contains("12"));
    }

    #[test]
    fn test_history_empty() {
        let (mut ctx, output) = context("");
        ctx.history.clear_history();
        HistoryCommand.execute(&mut ctx).unwrap();
        assert!(output.contents().contains("No calculation history available."));
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let (mut ctx, output) = context("n\n");
        ClearHistoryCommand.execute(&mut ctx).unwrap();
        assert!(output.contents().contains("Operation cancelled."));
        assert_eq!(ctx.history.len(), 1);
    }

    #[test]
    fn test_clear_confirmed() {
        let (mut ctx, output) = context("Y\n");
        ClearHistoryCommand.execute(&mut ctx).unwrap();
        assert!(output.contents().contains("History cleared successfully."));
        assert!(ctx.history.is_empty());
    }
}
