//! Missing-value fill transform

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::Result;
use serde_json::Value;

/// Transform that fills null or absent fields from neighboring records
///
/// Forward-fills each field from the last non-null value, then
/// back-fills leading gaps from the first non-null value, matching the
/// usual fill-forward/fill-backward cleanup for ordered personal data.
/// A field that is null in every record stays untouched. Operates on
/// the configured `fields`, or on every field seen in the dataset when
/// none are given.
pub struct FillMissing {
    fields: Option<Vec<String>>,
}

impl FillMissing {
    pub fn new() -> Self {
        Self { fields: None }
    }

    pub fn with_fields(fields: Vec<&str>) -> Self {
        Self {
            fields: Some(fields.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Build from registry params. Optional: `fields` (list of strings).
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("fill_missing", p, &["fields"]);
        match p.get("fields") {
            None => Ok(Self::new()),
            Some(_) => Ok(Self {
                fields: Some(params::require_str_list(p, "fields")?),
            }),
        }
    }
}

impl Default for FillMissing {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for FillMissing {
    fn name(&self) -> &str {
        "fill_missing"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        let fields: Vec<String> = match &self.fields {
            Some(fields) => fields.clone(),
            None => {
                let mut fields: Vec<String> = Vec::new();
                for record in &input {
                    for field in record.keys() {
                        if !fields.contains(field) {
                            fields.push(field.clone());
                        }
                    }
                }
                fields
            }
        };

        let mut output = input;
        for field in &fields {
            fill_pass(output.iter_mut(), field);
            fill_pass(output.iter_mut().rev(), field);
        }

        Ok(output)
    }
}

/// One directional fill: carry the last non-null value into gaps
fn fill_pass<'a>(records: impl Iterator<Item = &'a mut crate::etl::Record>, field: &str) {
    let mut last: Option<Value> = None;
    for record in records {
        match record.get(field) {
            Some(value) if !value.is_null() => last = Some(value.clone()),
            _ => {
                if let Some(value) = &last {
                    record.insert(field.to_string(), value.clone());
                }
            }
        }
    }
}
