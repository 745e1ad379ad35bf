use crate::error::{Result, ResultExt};
use crate::io::{ExportFormat, write_dataset};
use crate::types::{
    AnalysisReport, CleanedDataset, CleaningAction, ColumnSummary, IssueType, PipelineResult,
    Severity,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// File stem used when no output name is configured.
const DEFAULT_STEM: &str = "dataset";

// ============================================================================
// Comprehensive Report Types
// ============================================================================

/// Comprehensive report merging analysis and cleaning results.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the cleaned CSV (if written)
    pub output_file: Option<String>,

    pub processing_summary: ProcessingSummaryReport,
    pub quality_assessment: QualityAssessment,

    /// Full analysis of the raw data
    pub analysis: AnalysisReport,
    /// Ordered cleaning audit trail
    pub cleaning_actions: Vec<CleaningAction>,
    /// Per-column summaries of changes
    pub column_summaries: Vec<ColumnSummary>,
}

/// Summary of processing for the comprehensive report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummaryReport {
    pub duration_ms: u64,
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    pub rows_removed_percent: f64,
    pub values_imputed: usize,
    pub values_capped: usize,
    /// Data quality score before (0.0-1.0)
    pub data_quality_before: f64,
    /// Data quality score after (0.0-1.0)
    pub data_quality_after: f64,
    /// Improvement in percentage points
    pub quality_improvement: f64,
    pub warnings: Vec<String>,
}

/// Issue overview for the comprehensive report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub issue_count: usize,
    pub high_severity_issues: usize,
    pub medium_severity_issues: usize,
    /// Columns with at least one value outside the IQR bounds
    pub outlier_columns: Vec<String>,
    /// Columns with a high-severity missing-values issue
    pub high_missing_columns: Vec<String>,
    /// Fraction of non-missing cells in the raw data
    pub completeness: f64,
}

pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            output_name: None,
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    /// Base name shared by every written file.
    pub fn file_stem(&self) -> &str {
        self.output_name.as_deref().unwrap_or(DEFAULT_STEM)
    }

    /// Render the analysis report as plain text.
    ///
    /// ```text
    /// Total rows: 5
    /// Total columns: 2
    /// Issues: 1
    ///
    /// [HIGH] MISSING_VALUES: Column 'b' has 60.0% missing values (3 missing)
    /// ```
    pub fn render_text(report: &AnalysisReport) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Total rows: {}", report.total_rows);
        let _ = writeln!(out, "Total columns: {}", report.total_cols);
        let _ = writeln!(out, "Issues: {}", report.issue_count());

        if !report.issues.is_empty() {
            out.push('\n');
        }
        for issue in &report.issues {
            let _ = writeln!(
                out,
                "[{}] {}: {}",
                issue.severity.label(),
                issue.issue_type.as_str(),
                issue.message
            );
        }
        out
    }

    /// Build a comprehensive report from pipeline results.
    pub fn build_comprehensive_report(
        input_file: &str,
        output_file: Option<&str>,
        result: &PipelineResult,
    ) -> ComprehensiveReport {
        let summary = &result.summary;
        let report = &result.report;

        let processing_summary = ProcessingSummaryReport {
            duration_ms: result.duration_ms,
            rows_before: summary.rows_before,
            rows_after: summary.rows_after,
            duplicates_removed: summary.duplicates_removed,
            rows_removed_percent: summary.rows_removed_percentage(),
            values_imputed: summary.values_imputed,
            values_capped: summary.values_capped,
            data_quality_before: summary.data_quality_score_before,
            data_quality_after: summary.data_quality_score_after,
            quality_improvement: summary.quality_improvement(),
            warnings: summary.warnings.clone(),
        };

        let high_missing_columns = report
            .issues_with_severity(Severity::High)
            .filter(|issue| issue.issue_type == IssueType::MissingValues)
            .map(|issue| issue.column.clone())
            .collect();

        let quality_assessment = QualityAssessment {
            issue_count: report.issue_count(),
            high_severity_issues: report.issues_with_severity(Severity::High).count(),
            medium_severity_issues: report.issues_with_severity(Severity::Medium).count(),
            outlier_columns: report
                .outlier_columns()
                .into_iter()
                .map(String::from)
                .collect(),
            high_missing_columns,
            completeness: report.completeness(),
        };

        ComprehensiveReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            processing_summary,
            quality_assessment,
            analysis: report.clone(),
            cleaning_actions: summary.actions.clone(),
            column_summaries: summary.column_summaries.clone(),
        }
    }

    /// Write a comprehensive report to `<stem>_report.json`.
    pub fn write_report_to_file(&self, report: &ComprehensiveReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", self.file_stem()));
        let mut file = File::create(&report_path)
            .context(format!("Failed to create {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write the plain-text rendering to `<stem>_report.txt`.
    pub fn write_text_report(&self, report: &AnalysisReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.txt", self.file_stem()));
        fs::write(&report_path, Self::render_text(report))
            .context(format!("Failed to write {}", report_path.display()))?;

        info!("Text report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write the cleaned dataset to `<stem>_cleaned.<csv|json>`.
    pub fn write_cleaned(&self, dataset: &CleanedDataset, format: ExportFormat) -> Result<PathBuf> {
        let output_path = self.output_dir.join(format!(
            "{}_cleaned.{}",
            self.file_stem(),
            format.extension()
        ));
        write_dataset(dataset, &output_path, format)?;

        info!("Dataset saved: {}", output_path.display());

        Ok(output_path)
    }
}
