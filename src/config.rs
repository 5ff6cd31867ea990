//! Pipeline configuration loading
//!
//! A pipeline is described by a declarative document (YAML or JSON) with
//! three top-level sections:
//!
//! ```yaml
//! source:
//!   kind: csv
//!   params:
//!     path: data/input.csv
//! transforms:
//!   - name: uppercase
//!     params:
//!       field: name
//!   - name: filter
//!     params:
//!       field: age
//!       op: gt
//!       value: 18
//! destination:
//!   kind: json
//!   params:
//!     path: data/output.json
//! ```
//!
//! Unknown keys are ignored; missing required keys fail configuration.
//! The configuration is immutable once loaded for a run.

use crate::error::PipelineError;
use serde::Deserialize;
use std::path::Path;

/// Free-form stage parameters, as parsed from the configuration document
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Source section: where and how to extract
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Extractor kind, resolved against the registry (e.g. `csv`, `json`)
    pub kind: String,
    #[serde(default)]
    pub params: Params,
    /// Whether an empty extraction result is acceptable
    #[serde(default = "default_true")]
    pub allow_empty: bool,
}

/// One transform step: registry name plus its parameters
#[derive(Debug, Clone, Deserialize)]
pub struct TransformConfig {
    pub name: String,
    #[serde(default)]
    pub params: Params,
}

/// Destination section: where and how to load
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationConfig {
    /// Loader kind, resolved against the registry (e.g. `csv`, `json`)
    pub kind: String,
    #[serde(default)]
    pub params: Params,
}

/// Complete pipeline configuration, immutable once loaded
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub transforms: Vec<TransformConfig>,
    pub destination: DestinationConfig,
}

fn default_true() -> bool {
    true
}

impl PipelineConfig {
    /// Load a configuration document from a file
    ///
    /// The format is chosen by extension: `.json` parses as JSON,
    /// anything else (including `.yaml`/`.yml`) as YAML.
    ///
    /// # Errors
    /// Returns [`PipelineError::Config`] if the file cannot be read or
    /// does not parse into a valid configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                PipelineError::Config(format!("failed to parse {}: {e}", path.display()))
            })?,
            _ => Self::from_yaml(&content).map_err(|e| {
                PipelineError::Config(format!("failed to parse {}: {e}", path.display()))
            })?,
        };

        Ok(config)
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Typed accessors for stage [`Params`]
///
/// Factories use these to validate required parameters at configure time
/// and to warn (never fail) on unrecognized ones.
pub mod params {
    use super::Params;
    use eyre::{Result, eyre};

    /// A required string parameter
    pub fn require_str<'a>(params: &'a Params, key: &str) -> Result<&'a str> {
        params
            .get(key)
            .ok_or_else(|| eyre!("missing required param '{key}'"))?
            .as_str()
            .ok_or_else(|| eyre!("param '{key}' must be a string"))
    }

    /// A required numeric parameter
    pub fn require_f64(params: &Params, key: &str) -> Result<f64> {
        params
            .get(key)
            .ok_or_else(|| eyre!("missing required param '{key}'"))?
            .as_f64()
            .ok_or_else(|| eyre!("param '{key}' must be a number"))
    }

    /// A required non-negative integer parameter
    pub fn require_usize(params: &Params, key: &str) -> Result<usize> {
        let value = params
            .get(key)
            .ok_or_else(|| eyre!("missing required param '{key}'"))?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| eyre!("param '{key}' must be a non-negative integer"))
    }

    /// A required list-of-strings parameter
    pub fn require_str_list(params: &Params, key: &str) -> Result<Vec<String>> {
        let list = params
            .get(key)
            .ok_or_else(|| eyre!("missing required param '{key}'"))?
            .as_array()
            .ok_or_else(|| eyre!("param '{key}' must be a list of strings"))?;

        list.iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| eyre!("param '{key}' must be a list of strings"))
            })
            .collect()
    }

    /// An optional string parameter
    pub fn optional_str<'a>(params: &'a Params, key: &str) -> Result<Option<&'a str>> {
        match params.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| eyre!("param '{key}' must be a string")),
        }
    }

    /// An optional single-character parameter (e.g. a CSV delimiter)
    pub fn optional_char(params: &Params, key: &str) -> Result<Option<char>> {
        match optional_str(params, key)? {
            None => Ok(None),
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Some(c)),
                    _ => Err(eyre!("param '{key}' must be a single character")),
                }
            }
        }
    }

    /// Warn about params the capability does not recognize
    ///
    /// Unknown-but-optional parameters never fail configuration.
    pub fn warn_unknown(owner: &str, params: &Params, known: &[&str]) {
        for key in params.keys() {
            if !known.contains(&key.as_str()) {
                log::warn!("{owner}: ignoring unknown param '{key}'");
            }
        }
    }
}
