use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Cell and Row Types
// ============================================================================

/// A single cell of a tabular dataset.
///
/// Serialized untagged, so a row reads as a plain JSON object:
/// `{"age": 31, "city": "Oslo", "note": null}`. Any other JSON type
/// (booleans, arrays, objects) fails to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

static NULL: Value = Value::Null;

impl Value {
    /// A cell is missing when it is null or the empty string.
    ///
    /// Numeric zero is present. Absent keys are handled by [`Row::value`],
    /// which yields `Null` for them.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::Number(_) => false,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Name of the variant, used in log lines and summaries.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
        }
    }
}

/// Renders the cell as it appears in delimited text: numbers use the
/// shortest representation that parses back to the same `f64`, null is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// An ordered mapping from column name to cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Cell for `column`, with an absent key read as `Null`.
    pub fn value(&self, column: &str) -> &Value {
        self.0.get(column).unwrap_or(&NULL)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut Value> {
        self.0.get_mut(column)
    }

    /// Insert or overwrite a cell; new keys are appended after existing ones.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(column.into(), value.into())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// Analysis Report Types
// ============================================================================

/// Missingness of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingStats {
    /// Number of rows where the cell is null, empty text, or absent.
    pub count: usize,
    /// `100 * count / total_rows`, 0 for an empty dataset.
    pub percent: f64,
}

/// IQR outlier statistics of a single column's numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierStats {
    /// Numeric values strictly outside `[lower_bound, upper_bound]`.
    pub count: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl OutlierStats {
    /// Clamp `value` into the bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.lower_bound {
            self.lower_bound
        } else if value > self.upper_bound {
            self.upper_bound
        } else {
            value
        }
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_bound || value > self.upper_bound
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    /// Upper-case label used by the plain-text report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    MissingValues,
    Outliers,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingValues => "MISSING_VALUES",
            Self::Outliers => "OUTLIERS",
        }
    }
}

/// A data-quality issue derived from a column's statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Column the issue was raised for.
    pub column: String,
    pub message: String,
}

/// Read-only result of analysing a raw dataset.
///
/// Column maps keep the dataset's column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_rows: usize,
    pub total_cols: usize,
    pub missing: IndexMap<String, MissingStats>,
    /// Only columns with at least one numeric value.
    pub outliers: IndexMap<String, OutlierStats>,
    pub issues: Vec<Issue>,
}

impl AnalysisReport {
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn issues_with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// Columns the outlier detector flagged at least one value in.
    pub fn outlier_columns(&self) -> Vec<&str> {
        self.outliers
            .iter()
            .filter(|(_, stats)| stats.count > 0)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Fraction of non-missing cells (0.0 - 1.0); 1.0 for an empty dataset.
    pub fn completeness(&self) -> f64 {
        let cells = self.total_rows * self.total_cols;
        if cells == 0 {
            return 1.0;
        }
        let missing: usize = self.missing.values().map(|m| m.count).sum();
        1.0 - missing as f64 / cells as f64
    }
}

// ============================================================================
// Cleaning Types
// ============================================================================

/// A cleaned, independent copy of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedDataset {
    /// Column set of the raw dataset, in order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl CleanedDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// How the imputer treats a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// More than the numeric-ratio threshold of present values are numbers.
    Numeric,
    Categorical,
}

impl ColumnKind {
    /// Fill strategy used for this kind of column.
    pub fn fill_method(&self) -> &'static str {
        match self {
            Self::Numeric => "median",
            Self::Categorical => "mode",
        }
    }
}

/// Summary of what cleaning did to the data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Number of rows in the raw dataset.
    pub rows_before: usize,
    /// Number of rows in the cleaned dataset.
    pub rows_after: usize,
    /// Rows dropped as duplicates of an earlier row.
    pub duplicates_removed: usize,
    /// Total cells filled by the imputer.
    pub values_imputed: usize,
    /// Total numeric cells clamped to outlier bounds.
    pub values_capped: usize,
    /// Fraction of non-missing cells before cleaning (0.0 - 1.0).
    pub data_quality_score_before: f64,
    /// Fraction of non-missing cells after cleaning (0.0 - 1.0).
    pub data_quality_score_after: f64,
    /// Ordered audit trail of cleaning actions.
    pub actions: Vec<CleaningAction>,
    /// Per-column summaries of changes.
    pub column_summaries: Vec<ColumnSummary>,
    /// Warnings generated during cleaning.
    pub warnings: Vec<String>,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: CleaningAction) {
        self.actions.push(action);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnSummary> {
        self.column_summaries.iter_mut().find(|c| c.name == name)
    }

    /// Percentage of raw rows removed as duplicates.
    pub fn rows_removed_percentage(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.duplicates_removed as f64 / self.rows_before as f64) * 100.0
        }
    }

    /// Data quality improvement in percentage points.
    pub fn quality_improvement(&self) -> f64 {
        (self.data_quality_score_after - self.data_quality_score_before) * 100.0
    }
}

/// A single action taken during cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningAction {
    pub action_type: ActionType,
    /// Column name, or "dataset" for row-level actions.
    pub target: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CleaningAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Duplicate rows were removed.
    DuplicatesRemoved,
    /// Missing values were imputed.
    ValueImputed,
    /// A column with missing values had nothing to impute from.
    ImputationSkipped,
    /// Numeric values were clamped to the outlier bounds.
    OutlierCapped,
}

impl ActionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DuplicatesRemoved => "Duplicates Removed",
            Self::ValueImputed => "Value Imputed",
            Self::ImputationSkipped => "Imputation Skipped",
            Self::OutlierCapped => "Outlier Capped",
        }
    }
}

/// Changes made to a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Imputation treatment; `None` when the column had no present values.
    pub kind: Option<ColumnKind>,
    /// Missing cells after deduplication, before imputation.
    pub missing_before: usize,
    pub missing_after: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<Value>,
    pub values_capped: usize,
}

impl ColumnSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            missing_before: 0,
            missing_after: 0,
            fill_value: None,
            values_capped: 0,
        }
    }

    /// Percentage of missing cells that were filled.
    pub fn imputation_percentage(&self) -> f64 {
        if self.missing_before == 0 {
            0.0
        } else {
            let imputed = self.missing_before.saturating_sub(self.missing_after);
            (imputed as f64 / self.missing_before as f64) * 100.0
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub report: AnalysisReport,
    pub cleaned: CleanedDataset,
    pub summary: CleaningSummary,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Files written when `save_to_disk` is enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub written_files: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_missingness() {
        assert!(Value::Null.is_missing());
        assert!(Value::from("").is_missing());
        assert!(!Value::from(" ").is_missing());
        assert!(!Value::from(0.0).is_missing());
        assert!(!Value::from(f64::NAN).is_missing());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(1.0).to_string(), "1");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(-0.1).to_string(), "-0.1");
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Text("a".to_string()));
    }

    #[test]
    fn test_value_json_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, 3, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Number(3.0),
                Value::Number(1.5),
                Value::Text("x".to_string())
            ]
        );
        assert!(serde_json::from_str::<Value>("true").is_err());
        assert!(serde_json::from_str::<Value>("[1]").is_err());
    }

    #[test]
    fn test_row_absent_key_reads_null() {
        let row: Row = [("a", Value::from(1.0))].into_iter().collect();
        assert_eq!(row.value("a"), &Value::Number(1.0));
        assert_eq!(row.value("b"), &Value::Null);
        assert!(row.get("b").is_none());
    }

    #[test]
    fn test_row_keeps_insertion_order() {
        let row: Row = serde_json::from_str(r#"{"z": 1, "a": "x", "m": null}"#).unwrap();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"z":1.0,"a":"x","m":null}"#);
    }

    #[test]
    fn test_outlier_stats_clamp() {
        let stats = OutlierStats {
            count: 1,
            lower_bound: -2.5,
            upper_bound: 9.5,
        };
        assert_eq!(stats.clamp(100.0), 9.5);
        assert_eq!(stats.clamp(-10.0), -2.5);
        assert_eq!(stats.clamp(3.0), 3.0);
        assert!(stats.is_outlier(9.6));
        assert!(!stats.is_outlier(9.5));
    }

    #[test]
    fn test_issue_serialization() {
        let issue = Issue {
            severity: Severity::High,
            issue_type: IssueType::MissingValues,
            column: "b".to_string(),
            message: "Column 'b' has 75.0% missing values".to_string(),
        };
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains(r#""severity":"high""#));
        assert!(json.contains(r#""type":"MISSING_VALUES""#));
    }

    #[test]
    fn test_report_completeness() {
        let mut report = AnalysisReport {
            total_rows: 4,
            total_cols: 2,
            ..Default::default()
        };
        report.missing.insert(
            "a".to_string(),
            MissingStats {
                count: 0,
                percent: 0.0,
            },
        );
        report.missing.insert(
            "b".to_string(),
            MissingStats {
                count: 2,
                percent: 50.0,
            },
        );
        assert!((report.completeness() - 0.75).abs() < 1e-9);
        assert_eq!(AnalysisReport::default().completeness(), 1.0);
    }

    #[test]
    fn test_action_type_names() {
        assert_eq!(ActionType::OutlierCapped.display_name(), "Outlier Capped");
        assert_eq!(
            serde_json::to_string(&ActionType::ImputationSkipped).unwrap(),
            r#""imputation_skipped""#
        );
    }

    #[test]
    fn test_cleaning_summary_percentages() {
        let mut summary = CleaningSummary::new();
        summary.rows_before = 10;
        summary.rows_after = 8;
        summary.duplicates_removed = 2;
        summary.data_quality_score_before = 0.75;
        summary.data_quality_score_after = 0.95;

        assert!((summary.rows_removed_percentage() - 20.0).abs() < 0.01);
        assert!((summary.quality_improvement() - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_column_summary_imputation_percentage() {
        let mut summary = ColumnSummary::new("age");
        summary.missing_before = 20;
        summary.missing_after = 5;
        assert!((summary.imputation_percentage() - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_action_types_serialize() {
        let expected = [
            (ActionType::DuplicatesRemoved, "\"duplicates_removed\""),
            (ActionType::ValueImputed, "\"value_imputed\""),
            (ActionType::ImputationSkipped, "\"imputation_skipped\""),
            (ActionType::OutlierCapped, "\"outlier_capped\""),
        ];
        for (action_type, json) in expected {
            assert_eq!(serde_json::to_string(&action_type).unwrap(), json);
        }
    }
}
