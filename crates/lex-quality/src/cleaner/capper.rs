use crate::types::{OutlierStats, Row, Value};
use indexmap::IndexMap;
use tracing::debug;

/// Clamps numeric cells to precomputed outlier bounds.
pub struct OutlierCapper;

impl OutlierCapper {
    /// Clamp every number of each column in `bounds` into its range.
    ///
    /// Text, null and NaN cells are left alone, as are columns without
    /// bounds. Returns the number of cells changed per column, in `bounds`
    /// order.
    pub fn cap(rows: &mut [Row], bounds: &IndexMap<String, OutlierStats>) -> IndexMap<String, usize> {
        let mut capped = IndexMap::with_capacity(bounds.len());

        for (column, stats) in bounds {
            let mut count = 0;
            for row in rows.iter_mut() {
                if let Some(Value::Number(n)) = row.get_mut(column)
                    && stats.is_outlier(*n)
                {
                    *n = stats.clamp(*n);
                    count += 1;
                }
            }

            if count > 0 {
                debug!(
                    "Capped {} values in '{}' to [{}, {}]",
                    count, column, stats.lower_bound, stats.upper_bound
                );
            }
            capped.insert(column.clone(), count);
        }

        capped
    }
}
