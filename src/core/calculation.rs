//! A single calculation

use std::fmt;

use rust_decimal::Decimal;

use crate::core::error::Result;
use crate::core::operations::Operation;

/// Two operands bound to an operation, with the result computed once at
/// construction so that a failing calculation never exists as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    a: Decimal,
    b: Decimal,
    operation: Operation,
    result: Decimal,
}

impl Calculation {
    /// Build a calculation, failing on division by zero or overflow.
    pub fn new(a: Decimal, b: Decimal, operation: Operation) -> Result<Self> {
        let result = operation.apply(a, b)?;
        Ok(Self {
            a,
            b,
            operation,
            result,
        })
    }

    pub fn a(&self) -> Decimal {
        self.a
    }

    pub fn b(&self) -> Decimal {
        self.b
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The result of applying the operation to the operands.
    pub fn result(&self) -> Decimal {
        self.result
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calculation({}, {}, {})", self.a, self.b, self.operation)
    }
}
