//! Custom error types for data-quality analysis and cleaning.
//!
//! The analysis and cleaning core is total over well-typed values, so every
//! error here originates at the boundary: an absent or column-less dataset,
//! a cell that is not null/number/text, a bad configuration, or I/O.
//!
//! Errors are serializable as `{ code, message }` so they can be handed to a
//! frontend unchanged.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the quality engine.
#[derive(Error, Debug)]
pub enum QualityError {
    /// No dataset was supplied (missing or empty input).
    #[error("No data loaded: {0}")]
    NoDataLoaded(String),

    /// The dataset has rows but its first row has no columns.
    #[error("Dataset has {rows} rows but no columns")]
    NoColumns { rows: usize },

    /// A cell could not be represented as null, number or text.
    #[error("Column '{column}' holds unsupported values of type {dtype}")]
    UnsupportedValue { column: String, dtype: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper (CSV ingestion and export).
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoDataLoaded(_) => "NO_DATA_LOADED",
            Self::NoColumns { .. } => "NO_COLUMNS",
            Self::UnsupportedValue { .. } => "UNSUPPORTED_VALUE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error was caused by the input dataset itself.
    ///
    /// Input errors are raised before any analysis runs, so no partial
    /// report ever accompanies them.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::NoDataLoaded(_) | Self::NoColumns { .. } | Self::UnsupportedValue { .. } => {
                true
            }
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for quality operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Io(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Json(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            QualityError::NoDataLoaded("data.csv".to_string()).error_code(),
            "NO_DATA_LOADED"
        );
        assert_eq!(QualityError::NoColumns { rows: 3 }.error_code(), "NO_COLUMNS");
    }

    #[test]
    fn test_is_input_error() {
        assert!(QualityError::NoColumns { rows: 1 }.is_input_error());
        assert!(
            QualityError::UnsupportedValue {
                column: "flag".to_string(),
                dtype: "bool".to_string(),
            }
            .is_input_error()
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!QualityError::Io(io).is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = QualityError::UnsupportedValue {
            column: "active".to_string(),
            dtype: "Boolean".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNSUPPORTED_VALUE"));
        assert!(json.contains("active"));
    }

    #[test]
    fn test_with_context() {
        let error = QualityError::NoColumns { rows: 2 }.with_context("During analysis");
        assert!(error.to_string().contains("During analysis"));
        assert_eq!(error.error_code(), "NO_COLUMNS");
        assert!(error.is_input_error());
    }
}
