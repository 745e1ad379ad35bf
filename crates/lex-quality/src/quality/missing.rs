use crate::types::{MissingStats, Row};
use crate::utils::missing_count;
use indexmap::IndexMap;

pub struct MissingnessAnalyzer;

impl MissingnessAnalyzer {
    /// Count missing cells (null, empty text, absent key) for every column.
    pub fn analyze(rows: &[Row], columns: &[String]) -> IndexMap<String, MissingStats> {
        let total = rows.len();

        columns
            .iter()
            .map(|column| {
                let count = missing_count(rows, column);
                let percent = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                (column.clone(), MissingStats { count, percent })
            })
            .collect()
    }
}
