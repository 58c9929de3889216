//! Text rendering for the interactive shell
//!
//! Pure functions from analytics values to printable strings; handlers do
//! the printing.

use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::core::analytics::{Distribution, Statistics, Summary};
use crate::core::operations::Operation;
use crate::core::record::{CalculationRecord, DISPLAY_TIMESTAMP_FORMAT};

/// Column headings of a rendered history table.
pub const TABLE_HEADINGS: [&str; 5] = ["Timestamp", "First Number", "Second Number", "Operation", "Result"];

/// Widest bar drawn by [`render_distribution`].
pub const CHART_WIDTH: usize = 40;

/// Render records as a right-aligned table with a heading row.
pub fn render_history_table(records: &[CalculationRecord]) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
                r.operand_a.to_string(),
                r.operand_b.to_string(),
                r.operation.name().to_string(),
                r.result.to_string(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADINGS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    out.push_str(&line(&TABLE_HEADINGS));
    for row in &rows {
        out.push('\n');
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&cells));
    }
    out
}

/// Capitalized operation label for headings.
pub fn operation_title(operation: Operation) -> String {
    let name = operation.name();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fixed4(value: Decimal) -> String {
    format!("{:.4}", value)
}

fn write_summary(out: &mut String, summary: &Summary, indent: &str, count_label: &str) {
    let std = summary.std.map_or_else(|| "n/a".to_string(), fixed4);
    let _ = writeln!(out, "{}{}: {}", indent, count_label, summary.count);
    let _ = writeln!(out, "{}Average result: {}", indent, fixed4(summary.mean));
    let _ = writeln!(out, "{}Minimum result: {}", indent, fixed4(summary.min));
    let _ = writeln!(out, "{}Maximum result: {}", indent, fixed4(summary.max));
    let _ = writeln!(out, "{}Standard deviation: {}", indent, std);
}

/// Render overall and per-operation statistics plus operation frequency.
pub fn render_statistics(statistics: &Statistics) -> String {
    let mut out = String::from("\n===== Calculation Statistics =====\n");

    if let Some(overall) = &statistics.overall {
        out.push_str("\nOverall Statistics:\n");
        write_summary(&mut out, overall, "  ", "Total calculations");
    }

    out.push_str("\nStatistics by Operation:\n");
    for (operation, summary) in &statistics.by_operation {
        let _ = writeln!(out, "\n  {}:", operation_title(*operation));
        write_summary(&mut out, summary, "    ", "Count");
    }

    out.push_str("\nOperation Frequency:\n");
    for (operation, summary) in &statistics.by_operation {
        let _ = writeln!(out, "  {}: {}", operation_title(*operation), summary.count);
    }

    out.trim_end().to_string()
}

/// Render a histogram as one labelled bar per bucket.
pub fn render_distribution(distribution: &Distribution) -> String {
    let peak = distribution.counts.iter().copied().max().unwrap_or(0);
    let last = distribution.counts.len().saturating_sub(1);

    let labels: Vec<String> = distribution
        .counts
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let close = if i == last { ']' } else { ')' };
            format!(
                "[{}, {}{}",
                fixed4(distribution.edges[i]),
                fixed4(distribution.edges[i + 1]),
                close
            )
        })
        .collect();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::from("Result Distribution:");
    for (label, &count) in labels.iter().zip(&distribution.counts) {
        let bar = if peak == 0 { 0 } else { count * CHART_WIDTH / peak };
        let _ = write!(
            out,
            "\n{:<width$} | {} {}",
            label,
            "#".repeat(bar),
            count,
            width = label_width
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculation::Calculation;
    use crate::core::history::HistoryStore;
    use rust_decimal_macros::dec;

    fn store() -> HistoryStore {
        let mut store = HistoryStore::default();
        store.add_calculation(&Calculation::new(dec!(10), dec!(5), Operation::Add).unwrap());
        store.add_calculation(&Calculation::new(dec!(100), dec!(8), Operation::Divide).unwrap());
        store
    }

    #[test]
    fn test_history_table_has_heading_and_rows() {
        let store = store();
        let table = render_history_table(store.get_history());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("First Number"));
        assert!(lines[1].ends_with("15"));
        assert!(lines[2].contains("divide"));
        assert!(lines[2].ends_with("12.5"));
    }

    #[test]
    fn test_statistics_text() {
        let store = store();
        let text = render_statistics(&store.analytics().get_statistics());
        assert!(text.contains("Total calculations: 2"));
        assert!(text.contains("Average result: 13.7500"));
        assert!(text.contains("  Add:"));
        assert!(text.contains("Divide: 1"));
        // single-record groups have no deviation
        assert!(text.contains("Standard deviation: n/a"));
    }

    #[test]
    fn test_operation_title() {
        assert_eq!(operation_title(Operation::Multiply), "Multiply");
    }

    #[test]
    fn test_distribution_chart() {
        let distribution = Distribution {
            edges: vec![dec!(0), dec!(5), dec!(10)],
            counts: vec![4, 2],
        };
        let chart = render_distribution(&distribution);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "Result Distribution:");
        assert!(lines[1].starts_with("[0.0000, 5.0000)"));
        assert!(lines[1].ends_with(&format!("{} 4", "#".repeat(CHART_WIDTH))));
        assert!(lines[2].starts_with("[5.0000, 10.0000]"));
        assert!(lines[2].ends_with(&format!("{} 2", "#".repeat(CHART_WIDTH / 2))));
    }
}
