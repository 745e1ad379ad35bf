//! Loading rows from CSV / JSON and exporting cleaned datasets.
//!
//! CSV goes through polars with every column read as text, then each cell is
//! typed with [`parse_cell`]. JSON objects are converted cell by cell; anything
//! other than null, numbers and strings is rejected as an unsupported value.
//!
//! Cleaned data is written back in the input's format, so JSON text such as
//! `"007"` keeps its type.

use crate::error::{QualityError, Result, ResultExt};
use crate::types::{CleanedDataset, Row, Value};
use crate::utils::{is_numeric_dtype, parse_cell};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use indexmap::IndexMap;
use polars::prelude::*;
use serde_json::Value as JsonValue;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

// ============================================================================
// Loading
// ============================================================================

/// Load rows from `path`, choosing the format by extension.
///
/// `.json` files are read as a JSON array of objects, everything else as CSV.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    match ExportFormat::for_input(path) {
        ExportFormat::Json => load_json(path),
        ExportFormat::Csv => load_csv(path),
    }
}

/// Load a CSV file with a header row.
pub fn load_csv(path: &Path) -> Result<Vec<Row>> {
    ensure_data(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;

    info!(
        "Loaded CSV: {} ({} rows x {} columns)",
        path.display(),
        df.height(),
        df.width()
    );

    rows_from_dataframe(&df)
}

/// Load a JSON array of flat objects.
pub fn load_json(path: &Path) -> Result<Vec<Row>> {
    ensure_data(path)?;

    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Err(QualityError::NoDataLoaded(path.display().to_string()));
    }

    // A top-level `null` is an absent dataset, not an empty one.
    let objects: Option<Vec<IndexMap<String, JsonValue>>> =
        serde_json::from_str(&content).context(format!("Invalid rows in {}", path.display()))?;
    let Some(objects) = objects else {
        return Err(QualityError::NoDataLoaded(path.display().to_string()));
    };

    let rows = objects
        .into_iter()
        .map(row_from_object)
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded JSON: {} ({} rows)", path.display(), rows.len());
    Ok(rows)
}

fn row_from_object(object: IndexMap<String, JsonValue>) -> Result<Row> {
    let mut row = Row::with_capacity(object.len());

    for (column, cell) in object {
        let value = match cell {
            JsonValue::Null => Value::Null,
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Number(n) => match n.as_f64() {
                Some(n) => Value::Number(n),
                None => return Err(unsupported(column, "number")),
            },
            JsonValue::Bool(_) => return Err(unsupported(column, "boolean")),
            JsonValue::Array(_) => return Err(unsupported(column, "array")),
            JsonValue::Object(_) => return Err(unsupported(column, "object")),
        };
        row.insert(column, value);
    }

    Ok(row)
}

fn unsupported(column: String, dtype: &str) -> QualityError {
    QualityError::UnsupportedValue {
        column,
        dtype: dtype.to_string(),
    }
}

// ============================================================================
// DataFrame Conversion
// ============================================================================

/// Convert a DataFrame into rows.
///
/// Numeric columns become numbers, string columns are typed cell by cell.
/// Any other dtype is rejected.
pub fn rows_from_dataframe(df: &DataFrame) -> Result<Vec<Row>> {
    let mut rows: Vec<Row> = (0..df.height())
        .map(|_| Row::with_capacity(df.width()))
        .collect();

    for column in df.get_columns() {
        let name = column.name().to_string();
        let values = column_values(&name, column.as_materialized_series())?;
        for (row, value) in rows.iter_mut().zip(values) {
            row.insert(name.as_str(), value);
        }
    }

    Ok(rows)
}

fn column_values(name: &str, series: &Series) -> Result<Vec<Value>> {
    let dtype = series.dtype();

    if dtype == &DataType::String {
        return Ok(series
            .str()?
            .into_iter()
            .map(|cell| cell.map_or(Value::Null, parse_cell))
            .collect());
    }

    if is_numeric_dtype(dtype) {
        let floats = series.cast(&DataType::Float64)?;
        return Ok(floats
            .f64()?
            .into_iter()
            .map(|cell| cell.map_or(Value::Null, Value::Number))
            .collect());
    }

    if dtype == &DataType::Null {
        return Ok(vec![Value::Null; series.len()]);
    }

    Err(QualityError::UnsupportedValue {
        column: name.to_string(),
        dtype: dtype.to_string(),
    })
}

/// Build a DataFrame of text columns from a cleaned dataset.
///
/// Cells are rendered with `Value`'s `Display`; nulls stay null.
pub fn dataframe_from_dataset(dataset: &CleanedDataset) -> Result<DataFrame> {
    let columns: Vec<Column> = dataset
        .columns
        .iter()
        .map(|name| {
            let cells: Vec<Option<String>> = dataset
                .rows
                .iter()
                .map(|row| match row.value(name) {
                    Value::Null => None,
                    value => Some(value.to_string()),
                })
                .collect();
            Column::from(Series::new(name.as_str().into(), cells))
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

// ============================================================================
// Export
// ============================================================================

/// File format for loading and writing datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// `.json` paths are JSON, everything else is CSV.
    pub fn for_input(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json { Self::Json } else { Self::Csv }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Write a cleaned dataset in `format`.
pub fn write_dataset(dataset: &CleanedDataset, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(dataset, path),
        ExportFormat::Json => write_json(dataset, path),
    }
}

/// Write a cleaned dataset as CSV with a header row.
///
/// CSV carries no cell types: on reload, empty text reads as null and
/// numeric-looking text as a number.
pub fn write_csv(dataset: &CleanedDataset, path: &Path) -> Result<()> {
    create_parent(path)?;

    let mut df = dataframe_from_dataset(dataset)?;
    let mut file = File::create(path).context(format!("Failed to create {}", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Failed to write {}", path.display()))?;

    debug!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

/// Write a cleaned dataset as a JSON array of objects.
pub fn write_json(dataset: &CleanedDataset, path: &Path) -> Result<()> {
    create_parent(path)?;

    let file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &dataset.rows)
        .context(format!("Failed to write {}", path.display()))?;

    debug!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_types_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.csv", "id,name,score\n1,alice,3.5\n2,,n/a\n3,12abc,1e2\n");

        let rows = load_csv(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["id", "name", "score"]);
        assert_eq!(rows[0].value("id"), &Value::Number(1.0));
        assert_eq!(rows[0].value("name"), &Value::from("alice"));
        assert!(rows[1].value("name").is_missing());
        assert_eq!(rows[1].value("score"), &Value::from("n/a"));
        assert_eq!(rows[2].value("name"), &Value::from("12abc"));
        assert_eq!(rows[2].value("score"), &Value::Number(100.0));
    }

    #[test]
    fn test_load_json_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[{"a": 1, "b": "x"}, {"a": null, "b": ""}]"#,
        );

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value("a"), &Value::Number(1.0));
        assert_eq!(rows[1].value("a"), &Value::Null);
        assert_eq!(rows[1].value("b"), &Value::from(""));
    }

    #[test]
    fn test_load_json_rejects_booleans() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.json", r#"[{"a": true}]"#);

        let err = load_json(&path).unwrap_err();
        assert!(matches!(
            err,
            QualityError::UnsupportedValue { ref column, ref dtype } if column == "a" && dtype == "boolean"
        ));
        assert!(err.is_input_error());

        let nested = write_file(&dir, "nested.json", r#"[{"a": 1, "b": [1, 2]}]"#);
        let err = load_json(&nested).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_VALUE");
        assert!(err.is_input_error());
    }

    #[test]
    fn test_load_json_null_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "null.json", "null");

        let err = load_json(&path).unwrap_err();
        assert!(matches!(err, QualityError::NoDataLoaded(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_load_json_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "order.json", r#"[{"z": 1, "a": "x", "m": null}]"#);

        let rows = load_json(&path).unwrap();
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_missing_or_empty_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            load_rows(&missing),
            Err(QualityError::NoDataLoaded(_))
        ));

        let empty = write_file(&dir, "empty.csv", "");
        assert!(matches!(load_csv(&empty), Err(QualityError::NoDataLoaded(_))));

        let blank = write_file(&dir, "blank.json", "  \n");
        assert!(matches!(load_json(&blank), Err(QualityError::NoDataLoaded(_))));
    }

    #[test]
    fn test_rows_from_dataframe() {
        let df = df![
            "n" => [Some(1i64), None, Some(3)],
            "s" => ["4.5", "x", ""],
        ]
        .unwrap();

        let rows = rows_from_dataframe(&df).unwrap();
        assert_eq!(rows[0].value("n"), &Value::Number(1.0));
        assert_eq!(rows[1].value("n"), &Value::Null);
        assert_eq!(rows[0].value("s"), &Value::Number(4.5));
        assert_eq!(rows[1].value("s"), &Value::from("x"));
        assert_eq!(rows[2].value("s"), &Value::from(""));
    }

    #[test]
    fn test_rows_from_dataframe_rejects_booleans() {
        let df = df!["flag" => [true, false]].unwrap();
        let err = rows_from_dataframe(&df).unwrap_err();
        assert!(matches!(err, QualityError::UnsupportedValue { ref column, .. } if column == "flag"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_csv_export_reloads_same_values() {
        let rows: Vec<Row> = vec![
            [
                ("id", Value::from(1.0)),
                ("city", Value::from("Oslo, NO")),
                ("score", Value::from(-0.25)),
            ]
            .into_iter()
            .collect(),
            [
                ("id", Value::from(2.0)),
                ("city", Value::Null),
                ("score", Value::from(1e-7)),
            ]
            .into_iter()
            .collect(),
        ];
        let dataset = CleanedDataset {
            columns: vec!["id".into(), "city".into(), "score".into()],
            rows: rows.clone(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cleaned.csv");
        write_csv(&dataset, &path).unwrap();

        let reloaded = load_csv(&path).unwrap();
        assert_eq!(reloaded, rows);
    }

    #[test]
    fn test_json_export_keeps_text_types() {
        let rows: Vec<Row> = vec![
            [("code", Value::from("42")), ("note", Value::from(""))]
                .into_iter()
                .collect(),
            [("code", Value::from("007")), ("note", Value::Null)]
                .into_iter()
                .collect(),
            [("code", Value::from(7.5)), ("note", Value::from("ok"))]
                .into_iter()
                .collect(),
        ];
        let dataset = CleanedDataset {
            columns: vec!["code".into(), "note".into()],
            rows: rows.clone(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cleaned.json");
        write_dataset(&dataset, &path, ExportFormat::Json).unwrap();

        let reloaded = load_rows(&path).unwrap();
        assert_eq!(reloaded, rows);
    }

    #[test]
    fn test_export_format_follows_extension() {
        assert_eq!(ExportFormat::for_input(Path::new("rows.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::for_input(Path::new("data.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::for_input(Path::new("data")), ExportFormat::Csv);
        assert_eq!(ExportFormat::Json.extension(), "json");
    }
}
