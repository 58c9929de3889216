//! `add`, `subtract`, `multiply` and `divide`

use tracing::{info, warn};

use crate::commands::{Command, CommandRegistry};
use crate::core::calculation::Calculation;
use crate::core::error::{CalcError, Result};
use crate::core::operations::{parse_decimal, Operation};
use crate::shell::AppContext;

pub const FIRST_PROMPT: &str = "Enter the first number: ";
pub const SECOND_PROMPT: &str = "Enter the second number: ";
pub const INVALID_INPUT: &str = "Invalid input. Please enter valid numbers.";
pub const DIVISION_BY_ZERO: &str = "Error: Division by zero.";

/// Prompts for two operands, applies one operation and records the result.
pub struct ArithmeticCommand {
    operation: Operation,
}

impl ArithmeticCommand {
    pub fn new(operation: Operation) -> Self {
        Self { operation }
    }
}

impl Command for ArithmeticCommand {
    fn name(&self) -> &'static str {
        self.operation.name()
    }

    fn description(&self) -> &'static str {
        match self.operation {
            Operation::Add => "Add two numbers",
            Operation::Subtract => "Subtract two numbers",
            Operation::Multiply => "Multiply two numbers",
            Operation::Divide => "Divide two numbers",
        }
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let first = ctx.console.ask(FIRST_PROMPT)?;
        let second = ctx.console.ask(SECOND_PROMPT)?;

        let (a, b) = match (parse_decimal(&first), parse_decimal(&second)) {
            (Ok(a), Ok(b)) => (a, b),
            _ => {
                warn!(operation = %self.operation, first = %first, second = %second, "invalid operands");
                return ctx.console.println(INVALID_INPUT);
            }
        };

        match Calculation::new(a, b, self.operation) {
            Ok(calculation) => {
                let record = ctx.history.add_calculation(&calculation);
                info!(operation = %record.operation, result = %record.result, "calculation recorded");
                ctx.console.println(format!("Result: {}", calculation.result()))
            }
            Err(CalcError::DivisionByZero) => {
                warn!(%a, "division by zero");
                ctx.console.println(DIVISION_BY_ZERO)
            }
            Err(e) => Err(e),
        }
    }
}

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    for operation in Operation::ALL {
        registry.register(Box::new(ArithmeticCommand::new(operation)))?;
    }
    Ok(())
}
