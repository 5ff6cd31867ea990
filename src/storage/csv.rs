//! CSV file extraction and loading

use crate::config::{Params, params};
use crate::etl::{Dataset, Extractor, Loader, Record};
use ::csv::{ReaderBuilder, WriterBuilder};
use eyre::{Context, Result, eyre};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Read records from a CSV file
///
/// The header row defines the field names. Cell values are inferred per
/// cell: integers and floats become numbers, `true`/`false` become
/// booleans, empty cells become null, everything else stays text.
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Build a reader from registry params
    ///
    /// Required: `path`. Optional: `delimiter` (single ASCII character).
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("csv source", p, &["path", "delimiter"]);
        let mut reader = Self::new(params::require_str(p, "path")?);
        if let Some(delimiter) = params::optional_char(p, "delimiter")? {
            if !delimiter.is_ascii() {
                return Err(eyre!("param 'delimiter' must be an ASCII character"));
            }
            reader = reader.with_delimiter(delimiter as u8);
        }
        Ok(reader)
    }
}

impl Extractor for CsvReader {
    fn extract(&self) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.path)
            .with_context(|| format!("failed to open CSV source: {}", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read CSV header: {}", self.path.display()))?
            .clone();

        let mut dataset = Dataset::new();
        for (line, row) in reader.records().enumerate() {
            let row = row.with_context(|| {
                format!("failed to read CSV row {} in {}", line + 1, self.path.display())
            })?;

            let mut record = Record::new();
            for (field, cell) in headers.iter().zip(row.iter()) {
                record.insert(field.to_string(), infer_cell(cell));
            }
            dataset.push(record);
        }

        log::debug!(
            "read {} record(s) from {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset)
    }
}

/// Infer the JSON type of a CSV cell
fn infer_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match cell {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = cell.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}

/// Write records to a CSV file
///
/// The header is the union of field names across all records, in
/// first-seen order. Null and absent fields render as empty cells;
/// nested values render as JSON text.
pub struct CsvWriter {
    path: PathBuf,
    delimiter: u8,
}

impl CsvWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Build a writer from registry params
    ///
    /// Required: `path`. Optional: `delimiter` (single ASCII character).
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("csv destination", p, &["path", "delimiter"]);
        let mut writer = Self::new(params::require_str(p, "path")?);
        if let Some(delimiter) = params::optional_char(p, "delimiter")? {
            if !delimiter.is_ascii() {
                return Err(eyre!("param 'delimiter' must be an ASCII character"));
            }
            writer = writer.with_delimiter(delimiter as u8);
        }
        Ok(writer)
    }
}

impl Loader for CsvWriter {
    fn load(&self, dataset: &[Record]) -> Result<usize> {
        let mut header: Vec<&String> = Vec::new();
        for record in dataset {
            for field in record.keys() {
                if !header.contains(&field) {
                    header.push(field);
                }
            }
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.path)
            .with_context(|| {
                format!("failed to open CSV destination: {}", self.path.display())
            })?;

        writer
            .write_record(header.iter().map(|s| s.as_str()))
            .context("failed to write CSV header")?;

        for record in dataset {
            let row: Vec<String> = header
                .iter()
                .map(|field| render_cell(record.get(field.as_str())))
                .collect();
            writer
                .write_record(&row)
                .context("failed to write CSV row")?;
        }

        writer
            .flush()
            .with_context(|| format!("failed to flush CSV destination: {}", self.path.display()))?;

        log::debug!(
            "wrote {} record(s) to {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset.len())
    }
}

/// Render a record value as a CSV cell
fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        // Nested structures fall back to JSON text
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_infer_cell_types() {
        assert_eq!(infer_cell(""), Value::Null);
        assert_eq!(infer_cell("true"), Value::Bool(true));
        assert_eq!(infer_cell("false"), Value::Bool(false));
        assert_eq!(infer_cell("42"), json!(42));
        assert_eq!(infer_cell("-7"), json!(-7));
        assert_eq!(infer_cell("3.5"), json!(3.5));
        assert_eq!(infer_cell("hello"), json!("hello"));
        assert_eq!(infer_cell("12 monkeys"), json!("12 monkeys"));
    }

    #[test]
    fn test_extract_typed_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, "name,age,active\nada,36,true\ngrace,,false\n").unwrap();

        let dataset = CsvReader::new(&path).extract().unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[0]["name"], json!("ada"));
        assert_eq!(dataset[0]["age"], json!(36));
        assert_eq!(dataset[0]["active"], json!(true));
        assert_eq!(dataset[1]["age"], Value::Null);
    }

    #[test]
    fn test_extract_header_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "name,age\n").unwrap();

        let dataset = CsvReader::new(&path).extract().unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_extract_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let reader = CsvReader::new(dir.path().join("nope.csv"));
        assert!(reader.extract().is_err());
    }

    #[test]
    fn test_load_and_reread() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let dataset = vec![
            json!({"name": "ada", "age": 36}).as_object().unwrap().clone(),
            json!({"name": "grace", "age": null}).as_object().unwrap().clone(),
        ];

        let count = CsvWriter::new(&path).load(&dataset).unwrap();
        assert_eq!(count, 2);

        let reread = CsvReader::new(&path).extract().unwrap();
        assert_eq!(reread.len(), 2);
        assert_eq!(reread[0]["name"], json!("ada"));
        assert_eq!(reread[0]["age"], json!(36));
        assert_eq!(reread[1]["age"], Value::Null);
    }

    #[test]
    fn test_load_union_header_across_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("union.csv");

        let dataset = vec![
            json!({"a": 1}).as_object().unwrap().clone(),
            json!({"a": 2, "b": "x"}).as_object().unwrap().clone(),
        ];

        CsvWriter::new(&path).load(&dataset).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("a,b"));
        assert_eq!(lines.next(), Some("1,"));
        assert_eq!(lines.next(), Some("2,x"));
    }

    #[test]
    fn test_custom_delimiter_from_params() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("semi.csv");
        std::fs::write(&path, "a;b\n1;2\n").unwrap();

        let p = json!({"path": path.to_str().unwrap(), "delimiter": ";"})
            .as_object()
            .unwrap()
            .clone();
        let dataset = CsvReader::from_params(&p).unwrap().extract().unwrap();
        assert_eq!(dataset[0]["b"], json!(2));
    }

    #[test]
    fn test_from_params_requires_path() {
        assert!(CsvReader::from_params(&Params::new()).is_err());
        assert!(CsvWriter::from_params(&Params::new()).is_err());
    }
}
