//! Main quality pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! running analysis and cleaning over a dataset.

use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::{Result, ResultExt};
use crate::io::{ExportFormat, load_rows};
use crate::quality::DataQualityAnalyzer;
use crate::reporting::ReportGenerator;
use crate::types::{AnalysisReport, CleanedDataset, CleaningSummary, PipelineResult, Row};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

/// The main quality pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().iqr_multiplier(3.0).build()?)
///     .build()?
///     .process(&rows)?;
///
/// println!("{} issues", result.report.issue_count());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    reporter: ReportGenerator,
}

// Callers may run the pipeline on a worker thread.
static_assertions::assert_impl_all!(Pipeline: Send, Sync);
static_assertions::assert_impl_all!(AnalysisReport: Send, Sync);
static_assertions::assert_impl_all!(PipelineResult: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyse raw rows without cleaning them.
    pub fn analyze(&self, rows: &[Row]) -> Result<AnalysisReport> {
        DataQualityAnalyzer::analyze(rows, &self.config)
    }

    /// Clean raw rows using the bounds of a report produced from the same rows.
    pub fn clean(
        &self,
        rows: &[Row],
        report: &AnalysisReport,
    ) -> Result<(CleanedDataset, CleaningSummary)> {
        DataCleaner::clean(rows, report, &self.config)
    }

    /// Analyse and clean `rows`.
    ///
    /// When `save_to_disk` is set, the cleaned dataset and both reports are
    /// written under the configured output directory. File inputs keep
    /// their format for the cleaned output.
    pub fn process(&self, rows: &[Row]) -> Result<PipelineResult> {
        self.run(rows, None).inspect_err(|e| error!("Pipeline error: {}", e))
    }

    /// Load `path` (CSV, or JSON by extension) and process it.
    pub fn process_file(&self, path: &Path) -> Result<PipelineResult> {
        let rows = load_rows(path).context(format!("Failed to load {}", path.display()))?;
        self.run(&rows, Some(path))
            .inspect_err(|e| error!("Pipeline error: {}", e))
    }

    fn run(&self, rows: &[Row], input: Option<&Path>) -> Result<PipelineResult> {
        let start_time = Instant::now();

        info!("Starting quality pipeline...");

        info!("Step 1: Analyzing data quality...");
        let report = self.analyze(rows)?;
        info!(
            "Found {} issues across {} columns",
            report.issue_count(),
            report.total_cols
        );

        info!("Step 2: Cleaning dataset...");
        let (cleaned, summary) = self.clean(rows, &report)?;

        let mut result = PipelineResult {
            report,
            cleaned,
            summary,
            duration_ms: 0,
            written_files: Vec::new(),
        };

        if self.config.save_to_disk {
            info!("Step 3: Saving output files...");
            result.written_files = self.save(&result, input)?;
        }

        result.duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Pipeline completed in {} ms", result.duration_ms);

        Ok(result)
    }

    fn save(&self, result: &PipelineResult, input: Option<&Path>) -> Result<Vec<String>> {
        let format = input.map(ExportFormat::for_input).unwrap_or_default();
        let cleaned_path = self.reporter.write_cleaned(&result.cleaned, format)?;
        let cleaned_file = cleaned_path.display().to_string();
        let text_path = self.reporter.write_text_report(&result.report)?;

        let input_file = input
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        let report =
            ReportGenerator::build_comprehensive_report(&input_file, Some(&cleaned_file), result);
        let json_path = self.reporter.write_report_to_file(&report)?;

        Ok(vec![
            cleaned_file,
            text_path.display().to_string(),
            json_path.display().to_string(),
        ])
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = ReportGenerator::new(config.output_dir.clone(), config.output_name.clone());

        Ok(Pipeline { config, reporter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn rows() -> Vec<Row> {
        [1.0, 2.0, 3.0, 4.0, 5.0, 100.0]
            .iter()
            .map(|&v| -> Row { [("v", Value::from(v))].into_iter().collect() })
            .collect()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert_eq!(pipeline.config().iqr_multiplier, 1.5);
        assert!(!pipeline.config().save_to_disk);
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let config = PipelineConfig {
            iqr_multiplier: -1.0,
            ..Default::default()
        };
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_process_in_memory() {
        let pipeline = Pipeline::builder().build().unwrap();
        let result = pipeline.process(&rows()).unwrap();

        assert_eq!(result.report.total_rows, 6);
        assert_eq!(result.summary.values_capped, 1);
        assert!(result.written_files.is_empty());
        assert_eq!(
            result.cleaned.rows[5].value("v"),
            &Value::Number(result.report.outliers["v"].upper_bound)
        );
    }

    #[test]
    fn test_process_saves_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder()
            .output_dir(dir.path())
            .output_name("run")
            .save_to_disk(true)
            .build()
            .unwrap();
        let pipeline = Pipeline::builder().config(config).build().unwrap();

        let result = pipeline.process(&rows()).unwrap();
        assert_eq!(result.written_files.len(), 3);
        assert!(dir.path().join("run_cleaned.csv").exists());
        assert!(dir.path().join("run_report.txt").exists());
        assert!(dir.path().join("run_report.json").exists());
    }

    #[test]
    fn test_process_file_missing_input() {
        let pipeline = Pipeline::builder().build().unwrap();
        let err = pipeline
            .process_file(Path::new("does/not/exist.csv"))
            .unwrap_err();
        assert_eq!(err.error_code(), "NO_DATA_LOADED");
        assert!(err.is_input_error());
    }
}
