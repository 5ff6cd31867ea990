//! JSON file extraction and loading

use crate::config::{Params, params};
use crate::etl::{Dataset, Extractor, Loader, Record};
use eyre::{Context, Result, bail};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Read records from a JSON file
///
/// The file must contain an array of objects. A single top-level object
/// is accepted and treated as a one-record dataset.
pub struct JsonReader {
    path: PathBuf,
}

impl JsonReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build a reader from registry params
    ///
    /// Required: `path`.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("json source", p, &["path"]);
        Ok(Self::new(params::require_str(p, "path")?))
    }
}

impl Extractor for JsonReader {
    fn extract(&self) -> Result<Dataset> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read JSON source: {}", self.path.display()))?;

        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON source: {}", self.path.display()))?;

        let dataset = match value {
            Value::Array(items) => {
                let mut dataset = Dataset::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(record) => dataset.push(record),
                        other => bail!(
                            "JSON source {} element {index} is not an object: {other}",
                            self.path.display()
                        ),
                    }
                }
                dataset
            }
            Value::Object(record) => vec![record],
            other => bail!(
                "JSON source {} must be an array of objects, got: {other}",
                self.path.display()
            ),
        };

        log::debug!(
            "read {} record(s) from {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset)
    }
}

/// Write records to a JSON file as an array of objects
pub struct JsonWriter {
    path: PathBuf,
    pretty: bool,
}

impl JsonWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Build a writer from registry params
    ///
    /// Required: `path`. Optional: `pretty` (default true).
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("json destination", p, &["path", "pretty"]);
        let mut writer = Self::new(params::require_str(p, "path")?);
        if let Some(pretty) = p.get("pretty") {
            writer = writer.with_pretty(
                pretty
                    .as_bool()
                    .ok_or_else(|| eyre::eyre!("param 'pretty' must be a boolean"))?,
            );
        }
        Ok(writer)
    }
}

impl Loader for JsonWriter {
    fn load(&self, dataset: &[Record]) -> Result<usize> {
        let json = if self.pretty {
            serde_json::to_string_pretty(dataset)
        } else {
            serde_json::to_string(dataset)
        }
        .context("failed to serialize dataset to JSON")?;

        std::fs::write(&self.path, json).with_context(|| {
            format!("failed to write JSON destination: {}", self.path.display())
        })?;

        log::debug!(
            "wrote {} record(s) to {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset.len())
    }
}
