//! Statistical imputation methods.
//!
//! Numeric columns are filled with the middle element of their sorted
//! numbers, categorical columns with their most frequent value.

use crate::types::{ColumnKind, Row, Value};
use crate::utils::{ValueKey, present_values, sort_floats};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Outcome of imputing one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnImputation {
    pub kind: ColumnKind,
    pub fill_value: Value,
    /// Number of cells that were filled.
    pub filled: usize,
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Numeric when the share of numbers among present values exceeds `threshold`.
    pub fn classify(present: &[&Value], threshold: f64) -> ColumnKind {
        if present.is_empty() {
            return ColumnKind::Categorical;
        }
        let numbers = present.iter().filter(|v| v.is_number()).count();
        if numbers as f64 / present.len() as f64 > threshold {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Element at `floor(n / 2)` of the sorted numbers.
    ///
    /// For an even count this is the upper of the two middle elements; the
    /// pair is never averaged. NaN is ignored.
    pub fn median(present: &[&Value]) -> Option<f64> {
        let mut numbers: Vec<f64> = present
            .iter()
            .filter_map(|v| v.as_number())
            .filter(|n| !n.is_nan())
            .collect();
        sort_floats(&mut numbers);
        numbers.get(numbers.len() / 2).copied()
    }

    /// Most frequent present value.
    ///
    /// Ties go to the value seen first, since the frequency map keeps
    /// insertion order and only a strictly greater count replaces the leader.
    pub fn mode(present: &[&Value]) -> Option<Value> {
        let mut counts: IndexMap<ValueKey<'_>, (usize, &Value)> = IndexMap::new();
        for &value in present {
            counts.entry(ValueKey::from(value)).or_insert((0, value)).0 += 1;
        }

        let mut best: Option<(usize, &Value)> = None;
        for &(count, value) in counts.values() {
            if best.is_none_or(|(leader, _)| count > leader) {
                best = Some((count, value));
            }
        }
        best.map(|(_, value)| value.clone())
    }

    /// Fill every missing cell of `column`.
    ///
    /// Returns `None` when the column has no present value to derive a fill
    /// from; the column is then left untouched.
    pub fn impute_column(
        rows: &mut [Row],
        column: &str,
        numeric_ratio_threshold: f64,
    ) -> Option<ColumnImputation> {
        let present: Vec<&Value> = present_values(rows, column).collect();
        if present.is_empty() {
            return None;
        }

        let kind = Self::classify(&present, numeric_ratio_threshold);
        let fill_value = match kind {
            ColumnKind::Numeric => match Self::median(&present) {
                Some(median) => Value::Number(median),
                None => {
                    warn!("Column '{}' has only NaN numbers, using mode", column);
                    Self::mode(&present)?
                }
            },
            ColumnKind::Categorical => Self::mode(&present)?,
        };

        let mut filled = 0;
        for row in rows.iter_mut() {
            if row.value(column).is_missing() {
                row.insert(column, fill_value.clone());
                filled += 1;
            }
        }

        debug!(
            "Filled {} cells in '{}' with {}: {}",
            filled,
            column,
            kind.fill_method(),
            fill_value
        );

        Some(ColumnImputation {
            kind,
            fill_value,
            filled,
        })
    }
}
