//! Stored calculation records and their CSV row form

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::calculation::Calculation;
use crate::core::error::{CalcError, Result};
use crate::core::operations::{parse_decimal, Operation};

/// Column order of the persisted history file.
pub const CSV_HEADER: [&str; 5] = ["timestamp", "a", "b", "operation", "result"];

/// Textual timestamp form written to history files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Timestamp form used in tables and prompts.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationRecord {
    /// When the calculation was recorded (local time, microsecond precision)
    pub timestamp: NaiveDateTime,
    /// First operand as supplied
    pub operand_a: Decimal,
    /// Second operand as supplied
    pub operand_b: Decimal,
    /// Operation applied
    pub operation: Operation,
    /// Result of the operation
    pub result: Decimal,
}

impl CalculationRecord {
    /// Record a calculation at the given instant.
    pub fn from_calculation(calculation: &Calculation, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(6),
            operand_a: calculation.a(),
            operand_b: calculation.b(),
            operation: calculation.operation(),
            result: calculation.result(),
        }
    }

    /// Rebuild the in-memory calculation, or `None` if the operands can no
    /// longer be bound to the operation (e.g. a hand-edited zero divisor).
    pub fn to_calculation(&self) -> Option<Calculation> {
        Calculation::new(self.operand_a, self.operand_b, self.operation).ok()
    }
}

// =============================================================================
// CSV Row Codec
// =============================================================================

/// Raw textual row as it appears in a history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CsvRow {
    pub timestamp: String,
    pub a: String,
    pub b: String,
    pub operation: String,
    pub result: String,
}

impl From<&CalculationRecord> for CsvRow {
    fn from(record: &CalculationRecord) -> Self {
        Self {
            timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            a: record.operand_a.to_string(),
            b: record.operand_b.to_string(),
            operation: record.operation.name().to_string(),
            result: record.result.to_string(),
        }
    }
}

impl CsvRow {
    /// Decode into a record.
    ///
    /// Returns `Ok(None)` for rows naming an operation outside the fixed
    /// set; any other bad field fails the row.
    pub fn into_record(self, line: u64) -> Result<Option<CalculationRecord>> {
        let Some(operation) = Operation::from_name(self.operation.trim()) else {
            return Ok(None);
        };

        let timestamp = parse_timestamp(&self.timestamp).ok_or_else(|| CalcError::MalformedRow {
            line,
            message: format!("unparseable timestamp '{}'", self.timestamp),
        })?;

        let field = |name: &str, text: &str| {
            parse_decimal(text).map_err(|_| CalcError::MalformedRow {
                line,
                message: format!("column '{}' is not a number: '{}'", name, text),
            })
        };

        Ok(Some(CalculationRecord {
            timestamp: timestamp.trunc_subsecs(6),
            operand_a: field("a", &self.a)?,
            operand_b: field("b", &self.b)?,
            operation,
            result: field("result", &self.result)?,
        }))
    }
}

/// Parse a timestamp in any of the accepted textual forms.
///
/// Accepts `YYYY-MM-DD HH:MM:SS[.ffffff]`, the ISO `T` separator, RFC 3339
/// with an offset (converted to its local wall-clock reading) and bare dates
/// (midnight).
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    let text = text.trim();
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_local());
    }

    parse_date(text).and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}
