//! Data cleaning module.
//!
//! Cleaning works on a deep copy of the raw rows and applies, in order:
//! - Duplicate row removal (first occurrence wins)
//! - Median / mode imputation of missing cells
//! - Capping of numeric cells to the analysis report's outlier bounds

mod capper;
mod dedup;

pub use capper::OutlierCapper;
pub use dedup::Deduplicator;

use crate::config::PipelineConfig;
use crate::error::{QualityError, Result};
use crate::imputers::StatisticalImputer;
use crate::types::{
    ActionType, AnalysisReport, CleanedDataset, CleaningAction, CleaningSummary, ColumnSummary,
    Row,
};
use crate::utils::{column_names, completeness, missing_count};
use tracing::{debug, info, warn};

/// Cleaning orchestrator.
pub struct DataCleaner;

impl DataCleaner {
    /// Produce a cleaned copy of `rows`.
    ///
    /// `report` must come from analysing the same raw rows; its outlier
    /// bounds are used as-is and never recomputed on the cleaned data.
    pub fn clean(
        rows: &[Row],
        report: &AnalysisReport,
        config: &PipelineConfig,
    ) -> Result<(CleanedDataset, CleaningSummary)> {
        let columns = column_names(rows);
        if !rows.is_empty() && columns.is_empty() {
            return Err(QualityError::NoColumns { rows: rows.len() });
        }

        info!("Cleaning dataset: {} rows", rows.len());

        let mut summary = CleaningSummary::new();
        summary.rows_before = rows.len();
        summary.data_quality_score_before = completeness(rows, &columns);

        let mut working = rows.to_vec();

        // 1. Duplicates
        if config.remove_duplicates {
            let (kept, removed) = Deduplicator::deduplicate(working, &columns);
            working = kept;
            summary.duplicates_removed = removed;

            if removed > 0 {
                let pct = (removed as f64 / rows.len() as f64) * 100.0;
                summary.add_action(CleaningAction::new(
                    ActionType::DuplicatesRemoved,
                    "dataset",
                    format!("Removed {} duplicate rows ({:.1}%)", removed, pct),
                ));
                debug!("Removed {} duplicate rows", removed);
            } else {
                debug!("No duplicate rows found");
            }
        } else {
            debug!("Skipping duplicate removal (disabled)");
        }

        summary.column_summaries = columns
            .iter()
            .map(|column| {
                let mut col = ColumnSummary::new(column);
                col.missing_before = missing_count(&working, column);
                col
            })
            .collect();

        // 2. Missing values
        if config.impute_missing {
            Self::impute(&mut working, &columns, config, &mut summary);
        } else {
            debug!("Skipping imputation (disabled)");
        }

        // 3. Outliers
        if config.cap_outliers {
            let capped = OutlierCapper::cap(&mut working, &report.outliers);
            for (column, count) in capped {
                if count == 0 {
                    continue;
                }
                summary.values_capped += count;
                if let Some(col) = summary.column_mut(&column) {
                    col.values_capped = count;
                }
                let bounds = &report.outliers[&column];
                summary.add_action(
                    CleaningAction::new(
                        ActionType::OutlierCapped,
                        &column,
                        format!("Capped {} values in '{}'", count, column),
                    )
                    .with_details(format!(
                        "bounds [{}, {}]",
                        bounds.lower_bound, bounds.upper_bound
                    )),
                );
            }
        } else {
            debug!("Skipping outlier capping (disabled)");
        }

        for col in &mut summary.column_summaries {
            col.missing_after = missing_count(&working, &col.name);
        }
        summary.rows_after = working.len();
        summary.data_quality_score_after = completeness(&working, &columns);

        info!(
            "Cleaning complete: {} -> {} rows, {} imputed, {} capped",
            summary.rows_before, summary.rows_after, summary.values_imputed, summary.values_capped
        );

        Ok((
            CleanedDataset {
                columns,
                rows: working,
            },
            summary,
        ))
    }

    fn impute(
        rows: &mut [Row],
        columns: &[String],
        config: &PipelineConfig,
        summary: &mut CleaningSummary,
    ) {
        for column in columns {
            let missing = summary.column_mut(column).map_or(0, |c| c.missing_before);

            let Some(outcome) =
                StatisticalImputer::impute_column(rows, column, config.numeric_ratio_threshold)
            else {
                if missing > 0 {
                    let message = format!("Column '{}' has no values to impute from", column);
                    warn!("{}", message);
                    summary.add_action(CleaningAction::new(
                        ActionType::ImputationSkipped,
                        column,
                        message.clone(),
                    ));
                    summary.add_warning(message);
                }
                continue;
            };

            if let Some(col) = summary.column_mut(column) {
                col.kind = Some(outcome.kind);
                if outcome.filled > 0 {
                    col.fill_value = Some(outcome.fill_value.clone());
                }
            }

            if outcome.filled > 0 {
                summary.values_imputed += outcome.filled;
                summary.add_action(
                    CleaningAction::new(
                        ActionType::ValueImputed,
                        column,
                        format!(
                            "Filled {} missing values in '{}' with {}",
                            outcome.filled,
                            column,
                            outcome.kind.fill_method()
                        ),
                    )
                    .with_details(format!(
                        "fill value: {} ({})",
                        outcome.fill_value,
                        outcome.fill_value.kind_name()
                    )),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::DataQualityAnalyzer;
    use crate::types::{ColumnKind, Value};

    fn row(a: Value, b: Value) -> Row {
        [("a", a), ("b", b)].into_iter().collect()
    }

    fn dataset() -> Vec<Row> {
        vec![
            row(Value::from(1.0), Value::from("x")),
            row(Value::from(2.0), Value::from("")),
            row(Value::from(3.0), Value::from("x")),
            row(Value::from(4.0), Value::from("y")),
            row(Value::from(5.0), Value::Null),
            row(Value::from(100.0), Value::from("x")),
            row(Value::from(1.0), Value::from("x")),
        ]
    }

    fn run(rows: &[Row], config: &PipelineConfig) -> (CleanedDataset, CleaningSummary) {
        let report = DataQualityAnalyzer::analyze(rows, config).unwrap();
        DataCleaner::clean(rows, &report, config).unwrap()
    }

    #[test]
    fn test_full_clean() {
        let rows = dataset();
        let (cleaned, summary) = run(&rows, &PipelineConfig::default());

        assert_eq!(cleaned.columns, vec!["a", "b"]);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(cleaned.len(), 6);
        assert_eq!(summary.values_imputed, 2);
        assert_eq!(summary.values_capped, 1);
        assert!(
            cleaned
                .rows
                .iter()
                .all(|r| !r.value("a").is_missing() && !r.value("b").is_missing())
        );
        assert_eq!(summary.data_quality_score_after, 1.0);
        assert!(summary.data_quality_score_before < 1.0);
    }

    #[test]
    fn test_raw_rows_not_mutated() {
        let rows = dataset();
        let snapshot = rows.clone();
        let _ = run(&rows, &PipelineConfig::default());
        assert_eq!(rows, snapshot);
    }

    #[test]
    fn test_steps_can_be_disabled() {
        let rows = dataset();
        let config = PipelineConfig::builder()
            .remove_duplicates(false)
            .impute_missing(false)
            .cap_outliers(false)
            .build()
            .unwrap();

        let (cleaned, summary) = run(&rows, &config);
        assert_eq!(cleaned.rows, rows);
        assert!(summary.actions.is_empty());
        assert_eq!(summary.data_quality_score_before, summary.data_quality_score_after);
    }

    #[test]
    fn test_column_summaries() {
        let (_, summary) = run(&dataset(), &PipelineConfig::default());

        let b = &summary.column_summaries[1];
        assert_eq!(b.name, "b");
        assert_eq!(b.kind, Some(ColumnKind::Categorical));
        assert_eq!(b.missing_before, 2);
        assert_eq!(b.missing_after, 0);
        assert_eq!(b.fill_value, Some(Value::from("x")));

        let a = &summary.column_summaries[0];
        assert_eq!(a.kind, Some(ColumnKind::Numeric));
        assert_eq!(a.fill_value, None);
        assert_eq!(a.values_capped, 1);
    }

    #[test]
    fn test_all_missing_column_warns() {
        let rows: Vec<Row> = vec![
            row(Value::from(1.0), Value::Null),
            row(Value::from(2.0), Value::from("")),
        ];
        let (cleaned, summary) = run(&rows, &PipelineConfig::default());

        assert_eq!(summary.warnings.len(), 1);
        assert!(
            summary
                .actions
                .iter()
                .any(|a| a.action_type == ActionType::ImputationSkipped && a.target == "b")
        );
        assert_eq!(cleaned.rows[0].value("b"), &Value::Null);
        assert_eq!(summary.column_summaries[1].missing_after, 2);
    }

    #[test]
    fn test_empty_dataset() {
        let (cleaned, summary) = run(&[], &PipelineConfig::default());
        assert!(cleaned.is_empty());
        assert!(cleaned.columns.is_empty());
        assert_eq!(summary.rows_before, 0);
        assert_eq!(summary.data_quality_score_after, 1.0);
    }
}
