//! Report generation module.
//!
//! This module renders analysis reports and saves cleaned datasets.
//!
//! # Comprehensive Reports
//!
//! Use [`ComprehensiveReport`] to generate unified reports suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_quality::reporting::ReportGenerator;
//!
//! // Plain text, one line per issue
//! println!("{}", ReportGenerator::render_text(&result.report));
//!
//! // JSON, written next to the cleaned CSV
//! let report = ReportGenerator::build_comprehensive_report(
//!     "data/sales.csv",
//!     Some("output/sales_cleaned.csv"),
//!     &result,
//! );
//! let generator = ReportGenerator::new(PathBuf::from("output"), Some("sales".into()));
//! generator.write_report_to_file(&report)?;
//! ```

mod generator;

pub use generator::{
    ComprehensiveReport, ProcessingSummaryReport, QualityAssessment, ReportGenerator,
};
