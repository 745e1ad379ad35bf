//! Data quality analysis module.
//!
//! Produces an [`AnalysisReport`] from raw rows: missingness per column,
//! IQR outlier bounds per numeric column, and the issues derived from both.

mod classifier;
mod missing;
mod outliers;

pub use classifier::IssueClassifier;
pub use missing::MissingnessAnalyzer;
pub use outliers::OutlierDetector;

use crate::config::PipelineConfig;
use crate::error::{QualityError, Result};
use crate::types::{AnalysisReport, Row};
use crate::utils::column_names;
use tracing::{debug, info};

/// Analysis orchestrator.
pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Analyse a raw dataset.
    ///
    /// An empty dataset yields an empty report. A dataset whose first row has
    /// no columns is rejected before any statistic is computed.
    pub fn analyze(rows: &[Row], config: &PipelineConfig) -> Result<AnalysisReport> {
        let columns = column_names(rows);
        if !rows.is_empty() && columns.is_empty() {
            return Err(QualityError::NoColumns { rows: rows.len() });
        }

        info!(
            "Analyzing dataset: {} rows x {} columns",
            rows.len(),
            columns.len()
        );

        let missing = MissingnessAnalyzer::analyze(rows, &columns);
        let outliers = OutlierDetector::detect(rows, &columns, config.iqr_multiplier);
        let issues = IssueClassifier::classify(&missing, &outliers, config);

        debug!(
            "{} columns evaluated for outliers, {} issues found",
            outliers.len(),
            issues.len()
        );

        Ok(AnalysisReport {
            total_rows: rows.len(),
            total_cols: columns.len(),
            missing,
            outliers,
            issues,
        })
    }
}
