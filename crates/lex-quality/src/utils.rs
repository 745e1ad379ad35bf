//! Shared utilities for analysis and cleaning.
//!
//! The column extractor lives here: every analyzer and cleaner walks the
//! dataset column by column through these helpers, so "missing" and
//! "numeric" mean the same thing everywhere.

use crate::types::{Row, Value};
use once_cell::sync::Lazy;
use polars::prelude::DataType;
use regex::Regex;

// =============================================================================
// Column Extraction
// =============================================================================

/// Ordered column set of a dataset, taken from its first row.
pub fn column_names(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.columns().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Present (non-missing) values of `column`, in row order.
pub fn present_values<'a>(rows: &'a [Row], column: &'a str) -> impl Iterator<Item = &'a Value> {
    rows.iter()
        .map(move |row| row.value(column))
        .filter(|v| !v.is_missing())
}

/// Number of rows whose `column` cell is null, empty text, or absent.
pub fn missing_count(rows: &[Row], column: &str) -> usize {
    rows.iter().filter(|row| row.value(column).is_missing()).count()
}

/// Non-NaN numbers of `column`, in row order.
pub fn numeric_values(rows: &[Row], column: &str) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.value(column).as_number())
        .filter(|n| !n.is_nan())
        .collect()
}

/// Fraction of non-missing cells over `columns` (0.0 - 1.0).
///
/// An empty dataset scores 1.0: there is nothing missing.
pub fn completeness(rows: &[Row], columns: &[String]) -> f64 {
    let cells = rows.len() * columns.len();
    if cells == 0 {
        return 1.0;
    }
    let missing: usize = columns.iter().map(|c| missing_count(rows, c)).sum();
    1.0 - missing as f64 / cells as f64
}

/// Hashable identity of a cell.
///
/// Numbers compare by value: `0.0` and `-0.0` share a key, and every NaN
/// shares one key. Text compares by exact string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Null,
    Number(u64),
    Text(&'a str),
}

impl<'a> From<&'a Value> for ValueKey<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => ValueKey::Null,
            Value::Number(n) if *n == 0.0 => ValueKey::Number(0f64.to_bits()),
            Value::Number(n) if n.is_nan() => ValueKey::Number(f64::NAN.to_bits()),
            Value::Number(n) => ValueKey::Number(n.to_bits()),
            Value::Text(s) => ValueKey::Text(s),
        }
    }
}

// =============================================================================
// Order Statistics
// =============================================================================

/// Sort floats ascending. NaN must already be filtered out by the caller.
pub fn sort_floats(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Nearest-rank order statistic: `sorted[floor(n * fraction)]`.
///
/// No interpolation between neighbours. Returns `None` for an empty slice.
pub fn nearest_rank(sorted: &[f64], fraction: f64) -> Option<f64> {
    let idx = (sorted.len() as f64 * fraction) as usize;
    sorted.get(idx.min(sorted.len().saturating_sub(1))).copied()
}

// =============================================================================
// Cell Typing
// =============================================================================

// Decimal or scientific literal, optional sign, surrounding whitespace allowed.
static NUMBER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?\s*$")
        .expect("Invalid regex: number literal")
});

/// Check if a raw text cell holds a number literal.
pub fn is_number_literal(s: &str) -> bool {
    NUMBER_LITERAL.is_match(s)
}

/// Type a raw text cell from delimited input.
///
/// Finite number literals become `Number`; everything else, including the
/// empty string, stays `Text` verbatim.
pub fn parse_cell(raw: &str) -> Value {
    if is_number_literal(raw)
        && let Ok(n) = raw.trim().parse::<f64>()
        && n.is_finite()
    {
        return Value::Number(n);
    }
    Value::Text(raw.to_string())
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            [("a", Value::from(1.0)), ("b", Value::from("x"))]
                .into_iter()
                .collect(),
            [("a", Value::Null), ("b", Value::from(""))]
                .into_iter()
                .collect(),
            [("a", Value::from(f64::NAN))].into_iter().collect(),
        ]
    }

    #[test]
    fn test_column_names_from_first_row() {
        assert_eq!(column_names(&rows()), vec!["a", "b"]);
        assert!(column_names(&[]).is_empty());
    }

    #[test]
    fn test_missing_count_covers_null_empty_and_absent() {
        let rows = rows();
        assert_eq!(missing_count(&rows, "a"), 1);
        // empty string in row 2, absent key in row 3
        assert_eq!(missing_count(&rows, "b"), 2);
    }

    #[test]
    fn test_present_values_plus_missing_equals_total() {
        let rows = rows();
        for column in column_names(&rows) {
            assert_eq!(
                present_values(&rows, &column).count() + missing_count(&rows, &column),
                rows.len()
            );
        }
    }

    #[test]
    fn test_numeric_values_skip_nan() {
        assert_eq!(numeric_values(&rows(), "a"), vec![1.0]);
        assert!(numeric_values(&rows(), "b").is_empty());
    }

    #[test]
    fn test_completeness() {
        let rows = rows();
        let columns = column_names(&rows);
        // 6 cells, 3 missing
        assert!((completeness(&rows, &columns) - 0.5).abs() < 1e-9);
        assert_eq!(completeness(&[], &[]), 1.0);
    }

    #[test]
    fn test_nearest_rank() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        assert_eq!(nearest_rank(&sorted, 0.25), Some(2.0));
        assert_eq!(nearest_rank(&sorted, 0.75), Some(5.0));
        assert_eq!(nearest_rank(&sorted, 0.5), Some(4.0));
        assert_eq!(nearest_rank(&[7.0], 0.75), Some(7.0));
        assert_eq!(nearest_rank(&[], 0.25), None);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("42"), Value::Number(42.0));
        assert_eq!(parse_cell(" -3.5 "), Value::Number(-3.5));
        assert_eq!(parse_cell("1e3"), Value::Number(1000.0));
        assert_eq!(parse_cell(".5"), Value::Number(0.5));
        assert_eq!(parse_cell("12abc"), Value::Text("12abc".to_string()));
        assert_eq!(parse_cell("NaN"), Value::Text("NaN".to_string()));
        assert_eq!(parse_cell("inf"), Value::Text("inf".to_string()));
        assert_eq!(parse_cell(""), Value::Text(String::new()));
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }
}
