//! Analytics over a snapshot of the history table
//!
//! [`Analytics`] borrows a slice of records and derives statistics, range
//! filters, frequencies, histograms, trends and pivot tables from it. Every
//! operation accepts an empty snapshot and answers with an empty result.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};
use tracing::{debug, warn};

use crate::core::error::{CalcError, Result};
use crate::core::history::HistoryStore;
use crate::core::operations::Operation;
use crate::core::record::{parse_date, parse_timestamp, CalculationRecord, DISPLAY_TIMESTAMP_FORMAT};

// =============================================================================
// Summary Statistics
// =============================================================================

/// Count, sum, mean, extremes and sample standard deviation of a set of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    /// `None` when the total exceeds the decimal range
    pub sum: Option<Decimal>,
    pub mean: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    /// Sample (N-1) standard deviation; `None` for fewer than two values
    pub std: Option<Decimal>,
}

impl Summary {
    /// Summarize `values`, or `None` when there are none.
    pub fn from_values(values: &[Decimal]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;

        let (mut min, mut max) = (first, first);
        for &value in rest {
            min = min.min(value);
            max = max.max(value);
        }

        let count = values.len();
        let sum = values
            .iter()
            .try_fold(Decimal::ZERO, |acc, &v| acc.checked_add(v));
        let mean = sum
            .and_then(|total| total.checked_div(Decimal::from(count)))
            .unwrap_or_else(|| running_mean(values));

        Some(Self {
            count,
            sum,
            mean,
            min,
            max,
            std: sample_std(values, mean),
        })
    }

    /// Value of one aggregate for this summary.
    pub fn aggregate(&self, aggregate: Aggregate) -> Option<Decimal> {
        match aggregate {
            Aggregate::Count => Some(Decimal::from(self.count)),
            Aggregate::Sum => self.sum,
            Aggregate::Mean => Some(self.mean),
            Aggregate::Min => Some(self.min),
            Aggregate::Max => Some(self.max),
            Aggregate::Std => self.std,
        }
    }
}

/// Mean as a sum of `value / n` terms, for totals beyond the decimal range.
///
/// Every partial sum stays within `max(|value|)`, so no step overflows.
fn running_mean(values: &[Decimal]) -> Decimal {
    let n = Decimal::from(values.len());
    values
        .iter()
        .fold(Decimal::ZERO, |acc, &v| acc.saturating_add(v / n))
}

fn overflow(what: &str) -> CalcError {
    CalcError::Overflow {
        operation: what.to_string(),
    }
}

/// Sample standard deviation, exact where the squared deviations fit in a
/// decimal and through `f64` otherwise.
fn sample_std(values: &[Decimal], mean: Decimal) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let denominator = Decimal::from(values.len() - 1);

    let exact = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, &v| {
            let deviation = v.checked_sub(mean)?;
            acc.checked_add(deviation.checked_mul(deviation)?)
        })
        .and_then(|squares| squares.checked_div(denominator))
        .and_then(|variance| variance.sqrt());
    if exact.is_some() {
        return exact;
    }

    let mean = mean.to_f64()?;
    let squares: f64 = values
        .iter()
        .filter_map(|v| v.to_f64())
        .map(|v| (v - mean).powi(2))
        .sum();
    Decimal::from_f64((squares / (values.len() - 1) as f64).sqrt())
}

/// Statistics for the whole table and per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub overall: Option<Summary>,
    pub by_operation: BTreeMap<Operation, Summary>,
}

impl Statistics {
    pub fn is_empty(&self) -> bool {
        self.overall.is_none()
    }
}

// =============================================================================
// Date Bounds
// =============================================================================

/// A date-range bound given either as a parsed value or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// An exact instant
    DateTime(NaiveDateTime),
    /// A whole calendar day
    Date(NaiveDate),
    /// `YYYY-MM-DD` or any timestamp form accepted by history files
    Text(String),
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        DateInput::DateTime(value)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Date(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

enum Bound {
    Day(NaiveDate),
    Instant(NaiveDateTime),
}

impl DateInput {
    fn resolve(&self) -> Result<Bound> {
        match self {
            DateInput::DateTime(instant) => Ok(Bound::Instant(*instant)),
            DateInput::Date(date) => Ok(Bound::Day(*date)),
            DateInput::Text(text) => {
                if let Some(date) = parse_date(text) {
                    Ok(Bound::Day(date))
                } else if let Some(instant) = parse_timestamp(text) {
                    Ok(Bound::Instant(instant))
                } else {
                    Err(CalcError::InvalidDate {
                        input: text.clone(),
                    })
                }
            }
        }
    }

    /// Earliest instant covered by this bound.
    pub fn start(&self) -> Result<NaiveDateTime> {
        Ok(match self.resolve()? {
            Bound::Day(date) => date.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MIN),
            Bound::Instant(instant) => instant,
        })
    }

    /// Latest instant covered by this bound; a date covers its whole day.
    pub fn end(&self) -> Result<NaiveDateTime> {
        Ok(match self.resolve()? {
            Bound::Day(date) => date
                .and_hms_nano_opt(23, 59, 59, 999_999_999)
                .unwrap_or(NaiveDateTime::MAX),
            Bound::Instant(instant) => instant,
        })
    }
}

// =============================================================================
// Distribution
// =============================================================================

/// Largest bin count accepted by [`Analytics::get_result_distribution`].
pub const MAX_BINS: usize = 1000;

/// Equal-width histogram of results.
///
/// `edges` has one more entry than `counts`; bucket `i` covers
/// `[edges[i], edges[i + 1])`, the last bucket also includes its upper edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    pub edges: Vec<Decimal>,
    pub counts: Vec<usize>,
}

impl Distribution {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

// =============================================================================
// Pivot Tables
// =============================================================================

/// A column of the history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    A,
    B,
    Operation,
    Result,
}

impl Column {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "timestamp" => Some(Column::Timestamp),
            "a" => Some(Column::A),
            "b" => Some(Column::B),
            "operation" => Some(Column::Operation),
            "result" => Some(Column::Result),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::A => "a",
            Column::B => "b",
            Column::Operation => "operation",
            Column::Result => "result",
        }
    }

    fn key(&self, record: &CalculationRecord) -> GroupKey {
        match self {
            Column::Timestamp => GroupKey::Time(record.timestamp),
            Column::A => GroupKey::Number(record.operand_a),
            Column::B => GroupKey::Number(record.operand_b),
            Column::Operation => GroupKey::Text(record.operation.name().to_string()),
            Column::Result => GroupKey::Number(record.result),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::A | Column::B | Column::Result)
    }

    fn number(&self, record: &CalculationRecord) -> Option<Decimal> {
        match self {
            Column::A => Some(record.operand_a),
            Column::B => Some(record.operand_b),
            Column::Result => Some(record.result),
            Column::Timestamp | Column::Operation => None,
        }
    }
}

/// A named aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Sum,
    Mean,
    Min,
    Max,
    Std,
}

impl Aggregate {
    /// The aggregates shown on the statistics and pivot sheets.
    pub const SUMMARY: [Aggregate; 5] = [
        Aggregate::Count,
        Aggregate::Mean,
        Aggregate::Min,
        Aggregate::Max,
        Aggregate::Std,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::Sum => "sum",
            Aggregate::Mean => "mean",
            Aggregate::Min => "min",
            Aggregate::Max => "max",
            Aggregate::Std => "std",
        }
    }
}

impl FromStr for Aggregate {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "count" => Ok(Aggregate::Count),
            "sum" => Ok(Aggregate::Sum),
            "mean" => Ok(Aggregate::Mean),
            "min" => Ok(Aggregate::Min),
            "max" => Ok(Aggregate::Max),
            "std" => Ok(Aggregate::Std),
            other => Err(CalcError::invalid_argument(format!(
                "unknown aggregate '{}'",
                other
            ))),
        }
    }
}

/// Value of the grouping column for one pivot row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupKey {
    Time(NaiveDateTime),
    Number(Decimal),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Time(t) => write!(f, "{}", t.format(DISPLAY_TIMESTAMP_FORMAT)),
            GroupKey::Number(n) => write!(f, "{}", n),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

/// One group of a pivot table; `values` align with the table's aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRow {
    pub key: GroupKey,
    pub values: Vec<Option<Decimal>>,
}

/// Rows grouped by one column with aggregates over another, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotTable {
    pub index_column: String,
    pub value_column: String,
    pub aggregates: Vec<Aggregate>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Analytics Engine
// =============================================================================

/// Read-only analytics over a snapshot of records.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    records: &'a [CalculationRecord],
}

impl HistoryStore {
    /// Analytics over the current table.
    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(self.get_history())
    }
}

impl<'a> Analytics<'a> {
    pub fn new(records: &'a [CalculationRecord]) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &'a [CalculationRecord] {
        self.records
    }

    /// Result statistics overall and for each operation present.
    pub fn get_statistics(&self) -> Statistics {
        let results: Vec<Decimal> = self.records.iter().map(|r| r.result).collect();
        let overall = Summary::from_values(&results);

        let mut grouped: BTreeMap<Operation, Vec<Decimal>> = BTreeMap::new();
        for record in self.records {
            grouped.entry(record.operation).or_default().push(record.result);
        }

        let mut by_operation = BTreeMap::new();
        for (operation, values) in grouped {
            if let Some(summary) = Summary::from_values(&values) {
                by_operation.insert(operation, summary);
            }
        }

        debug!(records = self.records.len(), groups = by_operation.len(), "statistics computed");
        Statistics {
            overall,
            by_operation,
        }
    }

    /// Records whose timestamp lies within the inclusive bounds.
    ///
    /// Omitted bounds are open. Fails with [`CalcError::InvalidDate`] for
    /// text that is not a date.
    pub fn filter_by_date_range(
        &self,
        start: Option<DateInput>,
        end: Option<DateInput>,
    ) -> Result<Vec<CalculationRecord>> {
        let start = start.map(|s| s.start()).transpose()?;
        let end = end.map(|e| e.end()).transpose()?;

        let filtered: Vec<CalculationRecord> = self
            .records
            .iter()
            .filter(|r| start.map_or(true, |s| r.timestamp >= s))
            .filter(|r| end.map_or(true, |e| r.timestamp <= e))
            .cloned()
            .collect();

        debug!(?start, ?end, matched = filtered.len(), "filtered by date range");
        Ok(filtered)
    }

    /// Records whose result lies within the inclusive bounds.
    pub fn filter_by_result_range(
        &self,
        min: Option<Decimal>,
        max: Option<Decimal>,
    ) -> Vec<CalculationRecord> {
        let filtered: Vec<CalculationRecord> = self
            .records
            .iter()
            .filter(|r| min.map_or(true, |m| r.result >= m))
            .filter(|r| max.map_or(true, |m| r.result <= m))
            .cloned()
            .collect();

        debug!(?min, ?max, matched = filtered.len(), "filtered by result range");
        filtered
    }

    /// Number of records per operation present.
    pub fn get_operation_frequency(&self) -> BTreeMap<Operation, usize> {
        let mut frequency = BTreeMap::new();
        for record in self.records {
            *frequency.entry(record.operation).or_insert(0) += 1;
        }
        frequency
    }

    /// Operations in order of first appearance.
    pub fn operations_present(&self) -> Vec<Operation> {
        let mut seen = Vec::new();
        for record in self.records {
            if !seen.contains(&record.operation) {
                seen.push(record.operation);
            }
        }
        seen
    }

    /// `(timestamp, result)` series per operation, in insertion order.
    pub fn get_operation_trends(&self) -> BTreeMap<Operation, Vec<(NaiveDateTime, Decimal)>> {
        let mut trends: BTreeMap<Operation, Vec<(NaiveDateTime, Decimal)>> = BTreeMap::new();
        for record in self.records {
            trends
                .entry(record.operation)
                .or_default()
                .push((record.timestamp, record.result));
        }
        trends
    }

    /// Partition the observed result range into `bins` equal-width buckets.
    ///
    /// A range of a single value is widened around it (see
    /// [`widen_single_value`]). Fails with [`CalcError::InvalidArgument`] when
    /// `bins` is zero or above [`MAX_BINS`].
    pub fn get_result_distribution(&self, bins: usize) -> Result<Distribution> {
        if bins == 0 {
            return Err(CalcError::invalid_argument("bins must be a positive integer"));
        }
        if bins > MAX_BINS {
            return Err(CalcError::invalid_argument(format!(
                "bins must be at most {}",
                MAX_BINS
            )));
        }

        let Some(first) = self.records.first() else {
            return Ok(Distribution::default());
        };

        let (mut low, mut high) = (first.result, first.result);
        for record in self.records {
            low = low.min(record.result);
            high = high.max(record.result);
        }
        if low == high {
            (low, high) = widen_single_value(low)?;
        }

        let span = high.checked_sub(low).ok_or_else(|| overflow("distribution"))?;
        let bins_decimal = Decimal::from(bins);
        let width = span
            .checked_div(bins_decimal)
            .ok_or_else(|| overflow("distribution"))?;

        let mut edges = Vec::with_capacity(bins + 1);
        for i in 0..bins {
            let offset = width
                .checked_mul(Decimal::from(i))
                .ok_or_else(|| overflow("distribution"))?;
            edges.push(low + offset);
        }
        edges.push(high);

        let mut counts = vec![0usize; bins];
        for record in self.records {
            let index = if record.result >= high {
                bins - 1
            } else {
                (record.result - low)
                    .checked_div(width)
                    .and_then(|q| q.floor().to_usize())
                    .unwrap_or(0)
                    .min(bins - 1)
            };
            counts[index] += 1;
        }

        Ok(Distribution { edges, counts })
    }

    /// Group by `index_column` and aggregate `value_column`.
    ///
    /// Unknown or non-numeric value columns yield an empty table.
    pub fn pivot(&self, index_column: &str, value_column: &str, aggregates: &[Aggregate]) -> PivotTable {
        let mut table = PivotTable {
            index_column: index_column.to_string(),
            value_column: value_column.to_string(),
            aggregates: aggregates.to_vec(),
            rows: Vec::new(),
        };

        let (Some(index), Some(value)) = (Column::from_name(index_column), Column::from_name(value_column))
        else {
            warn!(index_column, value_column, "pivot over unknown column");
            return table;
        };
        if !value.is_numeric() {
            warn!(value_column, "pivot over non-numeric column");
            return table;
        }

        let mut groups: BTreeMap<GroupKey, Vec<Decimal>> = BTreeMap::new();
        for record in self.records {
            if let Some(number) = value.number(record) {
                groups.entry(index.key(record)).or_default().push(number);
            }
        }

        for (key, values) in groups {
            if let Some(summary) = Summary::from_values(&values) {
                let values = aggregates.iter().map(|&a| summary.aggregate(a)).collect();
                table.rows.push(PivotRow { key, values });
            }
        }

        table
    }
}

/// Bounds around a lone value `v`: `v ± h` where `h` is the larger of 0.5
/// and `|v| * 1e-10`, so the width survives decimal rounding at any
/// magnitude. Near the ends of the decimal range the whole width goes to the
/// side that fits.
fn widen_single_value(value: Decimal) -> Result<(Decimal, Decimal)> {
    let relative = value
        .abs()
        .checked_mul(Decimal::new(1, 10))
        .ok_or_else(|| overflow("distribution"))?;
    let half = relative.max(Decimal::new(5, 1));
    let width = half.checked_add(half).ok_or_else(|| overflow("distribution"))?;

    match (value.checked_sub(half), value.checked_add(half)) {
        (Some(low), Some(high)) => Some((low, high)),
        (None, _) => value.checked_add(width).map(|high| (value, high)),
        (_, None) => value.checked_sub(width).map(|low| (low, value)),
    }
    .ok_or_else(|| overflow("distribution"))
}
