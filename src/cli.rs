//! Command-line modes
//!
//! Argument shapes accepted by the `calc` binary and the one-shot
//! calculation it performs for `<a> <b> <operation>`.

use tracing::{error, info};

use crate::core::calculation::Calculation;
use crate::core::error::CalcError;
use crate::core::operations::{parse_decimal, Operation};

pub const USAGE: &str = "Usage:
  Interactive mode: calc [interactive]
  Command line mode: calc <number1> <number2> <operation>

Available operations: add, subtract, multiply, divide";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    OneShot {
        a: String,
        b: String,
        operation: String,
    },
}

impl Mode {
    /// Classify positional arguments, `None` for an unsupported shape.
    pub fn from_args(args: &[String]) -> Option<Self> {
        match args {
            [] => Some(Mode::Interactive),
            [single] if single.eq_ignore_ascii_case("interactive") => Some(Mode::Interactive),
            [a, b, operation] => Some(Mode::OneShot {
                a: a.clone(),
                b: b.clone(),
                operation: operation.clone(),
            }),
            _ => None,
        }
    }
}

/// Compute `a <operation> b` and describe the outcome in one line.
///
/// Every outcome, failures included, is a printable message.
pub fn one_shot(a: &str, b: &str, operation: &str) -> String {
    let operands = parse_decimal(a).and_then(|x| parse_decimal(b).map(|y| (x, y)));
    let (x, y) = match operands {
        Ok(pair) => pair,
        Err(_) => {
            error!(a, b, "invalid number input in command-line mode");
            return format!("Invalid number input: {} or {} is not a valid number.", a, b);
        }
    };

    let Some(op) = Operation::from_name(operation) else {
        error!(operation, "unknown operation in command-line mode");
        return format!("Unknown operation: {}", operation);
    };

    match Calculation::new(x, y, op) {
        Ok(calculation) => {
            info!(a, b, operation, result = %calculation.result(), "command-line calculation");
            format!(
                "The result of {} {} {} is equal to {}",
                a,
                operation,
                b,
                calculation.result()
            )
        }
        Err(CalcError::DivisionByZero) => {
            error!("division by zero in command-line mode");
            "Error: Division by zero.".to_string()
        }
        Err(e) => {
            error!(error = %e, "command-line calculation failed");
            format!("An error occurred: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mode_from_args() {
        assert_eq!(Mode::from_args(&args(&[])), Some(Mode::Interactive));
        assert_eq!(Mode::from_args(&args(&["Interactive"])), Some(Mode::Interactive));
        assert!(matches!(
            Mode::from_args(&args(&["5", "3", "add"])),
            Some(Mode::OneShot { .. })
        ));
        assert_eq!(Mode::from_args(&args(&["5"])), None);
        assert_eq!(Mode::from_args(&args(&["5", "3"])), None);
        assert_eq!(Mode::from_args(&args(&["1", "2", "3", "4"])), None);
    }

    #[test]
    fn test_usage_lists_every_operation() {
        let listed = USAGE
            .lines()
            .find_map(|line| line.strip_prefix("Available operations: "))
            .unwrap();
        let names: Vec<&str> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(listed.split(", ").collect::<Vec<_>>(), names);
    }

    #[test]
    fn test_one_shot_results() {
        assert_eq!(one_shot("5", "3", "add"), "The result of 5 add 3 is equal to 8");
        assert_eq!(one_shot("10", "2", "subtract"), "The result of 10 subtract 2 is equal to 8");
        assert_eq!(one_shot("4", "5", "multiply"), "The result of 4 multiply 5 is equal to 20");
        assert_eq!(one_shot("10", "4", "divide"), "The result of 10 divide 4 is equal to 2.5");
    }

    #[test]
    fn test_one_shot_failures() {
        assert_eq!(one_shot("1", "0", "divide"), "Error: Division by zero.");
        assert_eq!(one_shot("9", "3", "unknown"), "Unknown operation: unknown");
        assert_eq!(
            one_shot("a", "3", "add"),
            "Invalid number input: a or 3 is not a valid number."
        );
        // bad numbers are reported ahead of a bad operation
        assert_eq!(
            one_shot("5", "b", "power"),
            "Invalid number input: 5 or b is not a valid number."
        );
    }
}
