//! Data Quality Library
//!
//! Analysis and deterministic cleaning of tabular datasets, built with Rust
//! and Polars.
//!
//! # Overview
//!
//! Given rows of named cells (null, number or text), this library produces:
//!
//! - **Analysis Report**: per-column missingness, IQR outlier bounds, and
//!   severity-tagged issues
//! - **Cleaned Dataset**: an independent copy with duplicate rows removed,
//!   missing cells imputed (median or mode), and numbers capped to the
//!   report's bounds
//! - **Cleaning Summary**: an audit trail of every action plus before/after
//!   data quality scores
//!
//! The raw rows are never mutated, and the same input always yields the
//! same report and cleaned rows.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_quality::{Pipeline, PipelineConfig, ReportGenerator};
//! use std::path::Path;
//!
//! let result = Pipeline::builder()
//!     .config(PipelineConfig::default())
//!     .build()?
//!     .process_file(Path::new("data.csv"))?;
//!
//! print!("{}", ReportGenerator::render_text(&result.report));
//! println!("{} rows after cleaning", result.cleaned.len());
//! ```
//!
//! # Working With Rows Directly
//!
//! ```rust,ignore
//! use lex_quality::{DataCleaner, DataQualityAnalyzer, PipelineConfig, Row, Value};
//!
//! let rows: Vec<Row> = vec![
//!     [("age", Value::from(31.0)), ("city", Value::from("Oslo"))].into_iter().collect(),
//!     [("age", Value::Null), ("city", Value::from(""))].into_iter().collect(),
//! ];
//!
//! let config = PipelineConfig::default();
//! let report = DataQualityAnalyzer::analyze(&rows, &config)?;
//! let (cleaned, summary) = DataCleaner::clean(&rows, &report, &config)?;
//! ```
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to adjust thresholds or disable cleaning steps:
//!
//! ```rust,ignore
//! use lex_quality::config::*;
//!
//! let config = PipelineConfig::builder()
//!     .iqr_multiplier(3.0)            // wider outlier fences
//!     .high_missing_percent(70.0)
//!     .medium_missing_percent(20.0)
//!     .numeric_ratio_threshold(0.9)
//!     .remove_duplicates(false)
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, Deduplicator, OutlierCapper};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use imputers::{ColumnImputation, StatisticalImputer};
pub use io::{
    ExportFormat, load_csv, load_json, load_rows, rows_from_dataframe, write_csv, write_dataset,
    write_json,
};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use quality::{DataQualityAnalyzer, IssueClassifier, MissingnessAnalyzer, OutlierDetector};
pub use reporting::{
    ComprehensiveReport, ProcessingSummaryReport, QualityAssessment, ReportGenerator,
};
pub use types::{
    ActionType, AnalysisReport, CleanedDataset, CleaningAction, CleaningSummary, ColumnKind,
    ColumnSummary, Issue, IssueType, MissingStats, OutlierStats, PipelineResult, Row, Severity,
    Value,
};
