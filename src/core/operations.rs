//! Arithmetic operations
//!
//! The four binary operations over exact decimals, plus the [`Operation`] tag
//! that names them for dispatch and persistence.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::core::error::{CalcError, Result};

/// Add two decimals.
pub fn add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(Operation::Add))
}

/// Subtract `b` from `a`.
pub fn subtract(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(Operation::Subtract))
}

/// Multiply two decimals.
pub fn multiply(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(Operation::Multiply))
}

/// Divide `a` by `b`. Fails with [`CalcError::DivisionByZero`] when `b` is zero.
pub fn divide(a: Decimal, b: Decimal) -> Result<Decimal> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    a.checked_div(b).ok_or_else(|| overflow(Operation::Divide))
}

fn overflow(operation: Operation) -> CalcError {
    CalcError::Overflow {
        operation: operation.name().to_string(),
    }
}

/// An arithmetic operation.
///
/// The label returned by [`Operation::name`] is the stable persisted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// All operations in dispatch-table order.
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Persisted label.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Look up an operation by its exact label.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Apply the operation to two operands.
    pub fn apply(&self, a: Decimal, b: Decimal) -> Result<Decimal> {
        let function: fn(Decimal, Decimal) -> Result<Decimal> = match self {
            Operation::Add => add,
            Operation::Subtract => subtract,
            Operation::Multiply => multiply,
            Operation::Divide => divide,
        };
        function(a, b)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| CalcError::UnknownOperation {
            name: s.to_string(),
        })
    }
}

/// Parse operand text into an exact decimal.
///
/// Accepts plain (`-2.50`) and scientific (`1e3`) notation, ignoring
/// surrounding whitespace.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CalcError::invalid_input(text));
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CalcError::invalid_input(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_basic_operations() {
        assert_eq!(add(dec!(10), dec!(5)).unwrap(), dec!(15));
        assert_eq!(subtract(dec!(3), dec!(5)).unwrap(), dec!(-2));
        assert_eq!(multiply(dec!(10), dec!(0)).unwrap(), dec!(0));
        assert_eq!(divide(dec!(10), dec!(4)).unwrap(), dec!(2.5));
    }

    #[test]
    fn test_decimal_exactness() {
        // 0.1 + 0.2 is exact in decimal arithmetic
        assert_eq!(add(dec!(0.1), dec!(0.2)).unwrap(), dec!(0.3));
        assert_eq!(multiply(dec!(1.1), dec!(1.1)).unwrap(), dec!(1.21));
    }

    #[test]
    fn test_divide_by_zero() {
        let err = divide(dec!(1), dec!(0)).unwrap_err();
        assert!(matches!(err, CalcError::DivisionByZero));

        let err = divide(dec!(1), dec!(0.000)).unwrap_err();
        assert!(matches!(err, CalcError::DivisionByZero));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = multiply(Decimal::MAX, dec!(2)).unwrap_err();
        assert!(matches!(err, CalcError::Overflow { .. }));
    }

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
        assert_eq!(Operation::Divide.to_string(), "divide");
    }

    #[test]
    fn test_unknown_operation() {
        let err = "modulo".parse::<Operation>().unwrap_err();
        assert!(matches!(err, CalcError::UnknownOperation { .. }));
        // labels are case-sensitive
        assert!(Operation::from_name("Add").is_none());
    }

    #[test]
    fn test_apply_dispatch() {
        assert_eq!(Operation::Add.apply(dec!(2), dec!(3)).unwrap(), dec!(5));
        assert_eq!(Operation::Subtract.apply(dec!(2), dec!(3)).unwrap(), dec!(-1));
        assert_eq!(Operation::Multiply.apply(dec!(2), dec!(3)).unwrap(), dec!(6));
        assert!(Operation::Divide.apply(dec!(2), dec!(0)).is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("5").unwrap(), dec!(5));
        assert_eq!(parse_decimal(" -2.50 ").unwrap(), dec!(-2.50));
        assert_eq!(parse_decimal("1e3").unwrap(), dec!(1000));
        assert_eq!(parse_decimal("15.0").unwrap(), dec!(15));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        for text in ["a", "@", "", "   ", "NaN", "1.2.3"] {
            let err = parse_decimal(text).unwrap_err();
            assert!(matches!(err, CalcError::InvalidInput { .. }), "{text}");
        }
    }
}
