//! `statistics` and `distribution`

use crate::commands::{Command, CommandRegistry};
use crate::core::error::Result;
use crate::core::presenter::{render_distribution, render_statistics};
use crate::shell::AppContext;

/// Bucket count used when none is entered.
pub const DEFAULT_BINS: usize = 10;

/// Prints overall and per-operation statistics.
pub struct StatisticsCommand;

impl Command for StatisticsCommand {
    fn name(&self) -> &'static str {
        "statistics"
    }

    fn description(&self) -> &'static str {
        "Show statistics of calculation results"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let statistics = ctx.history.analytics().get_statistics();
        if statistics.is_empty() {
            return ctx
                .console
                .println("No calculation history available for statistics.");
        }
        ctx.console.println(render_statistics(&statistics))
    }
}

/// Charts the distribution of results.
pub struct DistributionCommand;

impl Command for DistributionCommand {
    fn name(&self) -> &'static str {
        "distribution"
    }

    fn description(&self) -> &'static str {
        "Chart the distribution of calculation results"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        if ctx.history.is_empty() {
            return ctx
                .console
                .println("No calculation history available for a distribution.");
        }

        let answer = ctx
            .console
            .ask(&format!("Enter number of bins [default: {}]: ", DEFAULT_BINS))?;
        let answer = answer.trim();
        let bins = if answer.is_empty() {
            DEFAULT_BINS
        } else {
            match answer.parse::<usize>() {
                Ok(bins) => bins,
                Err(_) => {
                    return ctx
                        .console
                        .println("Invalid input. Please enter a whole number of bins.")
                }
            }
        };

        let distribution = ctx.history.analytics().get_result_distribution(bins)?;
        ctx.console.println(render_distribution(&distribution))
    }
}

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(Box::new(StatisticsCommand))?;
    registry.register(Box::new(DistributionCommand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::calculation::Calculation;
    use crate::core::error::CalcError;
    use crate::core::operations::Operation;
    use crate::shell::{CapturedOutput, Console};
    use rust_decimal_macros::dec;

    fn context(script: &str, populated: bool) -> (AppContext, CapturedOutput) {
        let (console, output) = Console::scripted(script);
        let mut ctx = AppContext::new(AppConfig::default(), console);
        if populated {
            for (a, b, op) in [
                (dec!(10), dec!(5), Operation::Add),
                (dec!(20), dec!(10), Operation::Subtract),
                (dec!(5), dec!(5), Operation::Multiply),
            ] {
                ctx.history.add_calculation(&Calculation::new(a, b, op).unwrap());
            }
        }
        (ctx, output)
    }

    #[test]
    fn test_statistics_output() {
        let (mut ctx, output) = context("", true);
        StatisticsCommand.execute(&mut ctx).unwrap();
        let text = output.contents();
        assert!(text.contains("===== Calculation Statistics ====="));
        assert!(text.contains("Total calculations: 3"));
        assert!(text.contains("Maximum result: 25.0000"));
        assert!(text.contains("Subtract: 1"));
    }

    #[test]
    fn test_statistics_empty() {
        let (mut ctx, output) = context("", false);
        StatisticsCommand.execute(&mut ctx).unwrap();
        assert!(output
            .contents()
            .contains("No calculation history available for statistics."));
    }

    #[test]
    fn test_distribution_default_bins() {
        let (mut ctx, output) = context("\n", true);
        DistributionCommand.execute(&mut ctx).unwrap();
        let text = output.contents();
        assert!(text.contains("Result Distribution:"));
        assert_eq!(text.matches(" | ").count(), DEFAULT_BINS);
    }

    #[test]
    fn test_statistics_near_decimal_max() {
        let (mut ctx, output) = context("", false);
        let big = dec!(50000000000000000000000000000);
        for _ in 0..2 {
            ctx.history
                .add_calculation(&Calculation::new(big, dec!(0), Operation::Add).unwrap());
        }
        StatisticsCommand.execute(&mut ctx).unwrap();
        let text = output.contents();
        assert!(text.contains("Total calculations: 2"));
        assert!(text.contains("Average result: 50000000000000000000000000000"));
    }

    #[test]
    fn test_distribution_rejects_huge_bin_count() {
        let (mut ctx, _) = context("1099511627776\n", true);
        let err = DistributionCommand.execute(&mut ctx).unwrap_err();
        assert!(matches!(err, CalcError::InvalidArgument { .. }));
    }

    #[test]
    fn test_distribution_zero_bins_is_error() {
        let (mut ctx, _) = context("0\n", true);
        let err = DistributionCommand.execute(&mut ctx).unwrap_err();
        assert!(matches!(err, CalcError::InvalidArgument { .. }));
    }

    #[test]
    fn test_distribution_rejects_text() {
        let (mut ctx, output) = context("many\n", true);
        DistributionCommand.execute(&mut ctx).unwrap();
        assert!(output.contents().contains("Invalid input."));
    }
}
