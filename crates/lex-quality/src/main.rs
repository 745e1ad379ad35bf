//! CLI entry point for the data quality pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use lex_quality::config::{
    DEFAULT_HIGH_MISSING_PERCENT, DEFAULT_IQR_MULTIPLIER, DEFAULT_MEDIUM_MISSING_PERCENT,
    DEFAULT_NUMERIC_RATIO,
};
use lex_quality::{
    ComprehensiveReport, ExportFormat, Pipeline, PipelineConfig, PipelineResult, ReportGenerator,
    load_rows,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Data Quality Analysis and Cleaning",
    long_about = "Analyses a tabular dataset for missing values and outliers, then writes a \
                  cleaned copy with duplicates removed, gaps imputed and outliers capped.\n\n\
                  EXAMPLES:\n  \
                  # Analyse and clean a CSV file\n  \
                  lex-quality -i data.csv\n\n  \
                  # Only print the quality report\n  \
                  lex-quality -i data.csv --dry-run\n\n  \
                  # JSON rows, wider outlier fences, report files in results/\n  \
                  lex-quality -i rows.json --iqr-multiplier 3 -o results/ --emit-report"
)]
struct Args {
    /// Path to the CSV or JSON file to process
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for results
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses the input file name
    #[arg(long)]
    output_name: Option<String>,

    /// Only analyse the dataset and print the text report
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON and text reports to the output directory
    ///
    /// The reports will be saved as <name>_report.json and <name>_report.txt
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// IQR multiplier for outlier bounds
    #[arg(long, default_value_t = DEFAULT_IQR_MULTIPLIER)]
    iqr_multiplier: f64,

    /// Missing percentage above which a column is a high-severity issue
    #[arg(long, default_value_t = DEFAULT_HIGH_MISSING_PERCENT)]
    high_missing: f64,

    /// Missing percentage above which a column is a medium-severity issue
    #[arg(long, default_value_t = DEFAULT_MEDIUM_MISSING_PERCENT)]
    medium_missing: f64,

    /// Share of numbers among present values for median imputation (0.0 - 1.0)
    #[arg(long, default_value_t = DEFAULT_NUMERIC_RATIO)]
    numeric_ratio: f64,

    /// Keep duplicate rows
    #[arg(long)]
    keep_duplicates: bool,

    /// Leave missing values in place
    #[arg(long)]
    no_impute: bool,

    /// Leave outliers uncapped
    #[arg(long)]
    no_cap: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let pipeline = Pipeline::builder().config(config).build()?;

    if args.dry_run {
        return run_dry_run(&pipeline, &args);
    }

    info!("{}", "=".repeat(80));
    info!("Starting data quality pipeline...");
    info!("{}", "=".repeat(80));

    let result = pipeline.process_file(&args.input).inspect_err(|e| {
        error!("Pipeline failed: {} ({})", e, e.error_code());
    })?;

    handle_pipeline_output(&pipeline, &result, &args)
}

fn build_config(args: &Args) -> Result<PipelineConfig> {
    let output_name = args
        .output_name
        .clone()
        .unwrap_or_else(|| extract_file_stem(&args.input));

    // Files are written by the CLI itself, so the pipeline stays in memory.
    let config = PipelineConfig::builder()
        .iqr_multiplier(args.iqr_multiplier)
        .high_missing_percent(args.high_missing)
        .medium_missing_percent(args.medium_missing)
        .numeric_ratio_threshold(args.numeric_ratio)
        .remove_duplicates(!args.keep_duplicates)
        .impute_missing(!args.no_impute)
        .cap_outliers(!args.no_cap)
        .output_dir(&args.output)
        .output_name(output_name)
        .save_to_disk(false)
        .build()?;

    Ok(config)
}

/// Run dry-run mode: analyse only and print the text report.
///
/// Uses `println!` because the report is the command's output, not a log line.
fn run_dry_run(pipeline: &Pipeline, args: &Args) -> Result<()> {
    let rows = load_rows(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let report = pipeline.analyze(&rows)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Data quality report for {}", args.input.display());
    println!("{}\n", "=".repeat(80));
    print!("{}", ReportGenerator::render_text(&report));
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Always: write the cleaned dataset (same format as the input) to the output directory
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON and text reports to files
fn handle_pipeline_output(pipeline: &Pipeline, result: &PipelineResult, args: &Args) -> Result<()> {
    let config = pipeline.config();
    let generator = ReportGenerator::new(config.output_dir.clone(), config.output_name.clone());

    let format = ExportFormat::for_input(&args.input);
    let cleaned_path = generator.write_cleaned(&result.cleaned, format)?;
    let output_file = cleaned_path.display().to_string();

    let input_file = args.input.display().to_string();
    let report =
        ReportGenerator::build_comprehensive_report(&input_file, Some(&output_file), result);

    if args.emit_report {
        let json_path = generator.write_report_to_file(&report)?;
        let text_path = generator.write_text_report(&result.report)?;
        info!(
            "Reports written to: {}, {}",
            json_path.display(),
            text_path.display()
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}

/// Print a human-readable summary of the results.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(report: &ComprehensiveReport) {
    let summary = &report.processing_summary;
    let analysis = &report.analysis;

    println!();
    println!("{}", "=".repeat(80));
    println!("DATA QUALITY PIPELINE COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, analysis.total_rows, analysis.total_cols
    );
    if let Some(ref output_file) = report.output_file {
        println!("Output: {} ({} rows)", output_file, summary.rows_after);
    }
    println!();

    println!("Issues Found:");
    if analysis.issues.is_empty() {
        println!("  (none)");
    }
    for issue in &analysis.issues {
        println!(
            "  [{}] {}: {}",
            issue.severity.label(),
            issue.issue_type.as_str(),
            issue.message
        );
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} duplicates removed)",
        summary.rows_before, summary.rows_after, summary.duplicates_removed
    );
    println!("  Values imputed: {}", summary.values_imputed);
    println!("  Values capped: {}", summary.values_capped);
    println!(
        "  Data Quality: {:.1}% -> {:.1}%",
        summary.data_quality_before * 100.0,
        summary.data_quality_after * 100.0
    );
    println!();

    if !report.cleaning_actions.is_empty() {
        println!("Actions Taken:");
        for action in report.cleaning_actions.iter().take(10) {
            println!(
                "  - {}: {}",
                action.action_type.display_name(),
                action.description
            );
        }
        if report.cleaning_actions.len() > 10 {
            println!(
                "  ... and {} more actions",
                report.cleaning_actions.len() - 10
            );
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save the JSON and text reports");
    println!("{}", "=".repeat(80));
}
