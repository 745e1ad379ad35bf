//! Configuration types for quality analysis and cleaning.
//!
//! This module provides configuration options using the builder pattern.
//! Defaults: a 1.5 IQR multiplier, 50% / 10% missingness thresholds and a
//! 0.8 numeric ratio.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default multiplier applied to the IQR when computing outlier bounds.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
/// Missing percentage above which a column gets a high-severity issue.
pub const DEFAULT_HIGH_MISSING_PERCENT: f64 = 50.0;
/// Missing percentage above which a column gets a medium-severity issue.
pub const DEFAULT_MEDIUM_MISSING_PERCENT: f64 = 10.0;
/// Fraction of numeric present values above which a column is imputed as numeric.
pub const DEFAULT_NUMERIC_RATIO: f64 = 0.8;

/// Configuration for the quality pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .iqr_multiplier(3.0)
///     .cap_outliers(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Multiplier `k` in `q1 - k*iqr` / `q3 + k*iqr`.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Missing percentage (0 - 100) above which the issue is high severity.
    /// Default: 50.0
    pub high_missing_percent: f64,

    /// Missing percentage (0 - 100) above which the issue is medium severity.
    /// Must not exceed `high_missing_percent`.
    /// Default: 10.0
    pub medium_missing_percent: f64,

    /// Fraction (0.0 - 1.0) of present values that must be numbers for a
    /// column to be imputed with the median instead of the mode.
    /// Default: 0.8
    pub numeric_ratio_threshold: f64,

    /// Whether to remove duplicate rows.
    /// Default: true
    pub remove_duplicates: bool,

    /// Whether to impute missing values.
    /// Default: true
    pub impute_missing: bool,

    /// Whether to cap numeric values to the outlier bounds.
    /// Default: true
    pub cap_outliers: bool,

    /// Output directory for the cleaned dataset and reports.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Custom output file name (without extension).
    /// If None, uses "dataset".
    /// Default: None
    pub output_name: Option<String>,

    /// Whether the pipeline writes the cleaned CSV and reports to disk.
    /// Default: false
    pub save_to_disk: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            high_missing_percent: DEFAULT_HIGH_MISSING_PERCENT,
            medium_missing_percent: DEFAULT_MEDIUM_MISSING_PERCENT,
            numeric_ratio_threshold: DEFAULT_NUMERIC_RATIO,
            remove_duplicates: true,
            impute_missing: true,
            cap_outliers: true,
            output_dir: PathBuf::from("output"),
            output_name: None,
            save_to_disk: false,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        for (field, value) in [
            ("high_missing_percent", self.high_missing_percent),
            ("medium_missing_percent", self.medium_missing_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigValidationError::InvalidPercent {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.medium_missing_percent > self.high_missing_percent {
            return Err(ConfigValidationError::InvertedMissingThresholds {
                medium: self.medium_missing_percent,
                high: self.high_missing_percent,
            });
        }

        if !(0.0..=1.0).contains(&self.numeric_ratio_threshold) {
            return Err(ConfigValidationError::InvalidRatio {
                field: "numeric_ratio_threshold".to_string(),
                value: self.numeric_ratio_threshold,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be finite and non-negative)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid percentage for '{field}': {value} (must be between 0 and 100)")]
    InvalidPercent { field: String, value: f64 },

    #[error("Medium missing threshold {medium} exceeds high missing threshold {high}")]
    InvertedMissingThresholds { medium: f64, high: f64 },

    #[error("Invalid ratio for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidRatio { field: String, value: f64 },
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    iqr_multiplier: Option<f64>,
    high_missing_percent: Option<f64>,
    medium_missing_percent: Option<f64>,
    numeric_ratio_threshold: Option<f64>,
    remove_duplicates: Option<bool>,
    impute_missing: Option<bool>,
    cap_outliers: Option<bool>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    save_to_disk: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the IQR multiplier used for outlier bounds.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set the missing percentage above which issues are high severity.
    ///
    /// # Arguments
    /// * `percent` - Value between 0 and 100
    pub fn high_missing_percent(mut self, percent: f64) -> Self {
        self.high_missing_percent = Some(percent);
        self
    }

    /// Set the missing percentage above which issues are medium severity.
    ///
    /// # Arguments
    /// * `percent` - Value between 0 and 100
    pub fn medium_missing_percent(mut self, percent: f64) -> Self {
        self.medium_missing_percent = Some(percent);
        self
    }

    /// Set the numeric-ratio threshold used by the imputer.
    pub fn numeric_ratio_threshold(mut self, ratio: f64) -> Self {
        self.numeric_ratio_threshold = Some(ratio);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Enable or disable missing value imputation.
    pub fn impute_missing(mut self, impute: bool) -> Self {
        self.impute_missing = Some(impute);
        self
    }

    /// Enable or disable outlier capping.
    pub fn cap_outliers(mut self, cap: bool) -> Self {
        self.cap_outliers = Some(cap);
        self
    }

    /// Set the output directory for reports and cleaned data.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom output file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Enable or disable saving outputs to disk.
    ///
    /// When false, results are only returned in memory.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            iqr_multiplier: self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            high_missing_percent: self
                .high_missing_percent
                .unwrap_or(DEFAULT_HIGH_MISSING_PERCENT),
            medium_missing_percent: self
                .medium_missing_percent
                .unwrap_or(DEFAULT_MEDIUM_MISSING_PERCENT),
            numeric_ratio_threshold: self
                .numeric_ratio_threshold
                .unwrap_or(DEFAULT_NUMERIC_RATIO),
            remove_duplicates: self.remove_duplicates.unwrap_or(true),
            impute_missing: self.impute_missing.unwrap_or(true),
            cap_outliers: self.cap_outliers.unwrap_or(true),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("output")),
            output_name: self.output_name,
            save_to_disk: self.save_to_disk.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}
