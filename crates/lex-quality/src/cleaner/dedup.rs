use crate::types::Row;
use crate::utils::ValueKey;
use std::collections::HashSet;

/// Removes rows structurally equal to an earlier row.
pub struct Deduplicator;

impl Deduplicator {
    /// Keep the first occurrence of every distinct row, in original order.
    ///
    /// Rows are compared over `columns` (absent key equals null) plus any
    /// non-null cells outside the column set. Returns the kept rows and the
    /// number removed.
    pub fn deduplicate(rows: Vec<Row>, columns: &[String]) -> (Vec<Row>, usize) {
        let keep = Self::first_occurrences(&rows, columns);
        let before = rows.len();

        let kept: Vec<Row> = rows
            .into_iter()
            .zip(keep)
            .filter_map(|(row, keep)| keep.then_some(row))
            .collect();

        let removed = before - kept.len();
        (kept, removed)
    }

    /// Number of rows [`Deduplicator::deduplicate`] would remove.
    pub fn count_duplicates(rows: &[Row], columns: &[String]) -> usize {
        Self::first_occurrences(rows, columns)
            .into_iter()
            .filter(|keep| !keep)
            .count()
    }

    fn first_occurrences(rows: &[Row], columns: &[String]) -> Vec<bool> {
        let mut seen = HashSet::with_capacity(rows.len());
        rows.iter()
            .map(|row| seen.insert(Self::row_key(row, columns)))
            .collect()
    }

    fn row_key<'a>(row: &'a Row, columns: &'a [String]) -> Vec<(Option<&'a str>, ValueKey<'a>)> {
        let mut key: Vec<_> = columns
            .iter()
            .map(|column| (None, ValueKey::from(row.value(column))))
            .collect();

        // Cells outside the column set are tagged with their name.
        key.extend(
            row.iter()
                .filter(|(name, value)| {
                    !value.is_missing() && !columns.iter().any(|c| c == name)
                })
                .map(|(name, value)| (Some(name), ValueKey::from(value))),
        );
        key
    }
}
