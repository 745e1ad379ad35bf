//! IQR outlier detection.
//!
//! Quartiles use the nearest-rank method on the sorted numeric values:
//! `q1 = sorted[floor(n * 0.25)]`, `q3 = sorted[floor(n * 0.75)]`, with no
//! interpolation. Bounds are `q1 - k*iqr` and `q3 + k*iqr`.

use crate::types::{OutlierStats, Row};
use crate::utils::{nearest_rank, numeric_values, sort_floats};
use indexmap::IndexMap;
use tracing::debug;

pub struct OutlierDetector;

impl OutlierDetector {
    /// Compute outlier stats for every column holding at least one number.
    ///
    /// Columns without numbers are left out of the map: they are not
    /// evaluable, which is different from "no outliers".
    pub fn detect(
        rows: &[Row],
        columns: &[String],
        iqr_multiplier: f64,
    ) -> IndexMap<String, OutlierStats> {
        let mut result = IndexMap::new();

        for column in columns {
            let values = numeric_values(rows, column);
            if let Some(stats) = Self::column_stats(&values, iqr_multiplier) {
                debug!(
                    "Column '{}': {} numeric values, bounds [{}, {}], {} outliers",
                    column,
                    values.len(),
                    stats.lower_bound,
                    stats.upper_bound,
                    stats.count
                );
                result.insert(column.clone(), stats);
            }
        }

        result
    }

    /// Outlier stats of one column's numeric values (row order, NaN-free).
    pub fn column_stats(values: &[f64], iqr_multiplier: f64) -> Option<OutlierStats> {
        let mut sorted = values.to_vec();
        sort_floats(&mut sorted);

        let q1 = nearest_rank(&sorted, 0.25)?;
        let q3 = nearest_rank(&sorted, 0.75)?;
        let iqr = q3 - q1;

        let lower_bound = q1 - iqr_multiplier * iqr;
        let upper_bound = q3 + iqr_multiplier * iqr;

        let count = values
            .iter()
            .filter(|&&v| v < lower_bound || v > upper_bound)
            .count();

        Some(OutlierStats {
            count,
            lower_bound,
            upper_bound,
        })
    }
}
