//! Field dropper transform
//!
//! Removes specified fields from every record, typically bookkeeping
//! columns that should not reach the destination.

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::Result;

/// Transform that drops specified fields from every record
///
/// # Example
/// ```
/// use datapipe::transform::FieldDropper;
/// use datapipe::etl::Transform;
/// use serde_json::json;
///
/// let dropper = FieldDropper::new(vec!["internal_id", "updated_at"]);
/// let input = vec![json!({
///     "name": "ada",
///     "internal_id": "x-123",
///     "updated_at": "2024-01-01"
/// }).as_object().unwrap().clone()];
///
/// let output = dropper.apply(input).unwrap();
/// assert!(!output[0].contains_key("internal_id"));
/// assert!(!output[0].contains_key("updated_at"));
/// assert_eq!(output[0]["name"], "ada");
/// ```
pub struct FieldDropper {
    fields: Vec<String>,
}

impl FieldDropper {
    pub fn new(fields: Vec<&str>) -> Self {
        Self {
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build from registry params. Required: `fields` (list of strings).
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("drop_fields", p, &["fields"]);
        Ok(Self {
            fields: params::require_str_list(p, "fields")?,
        })
    }
}

impl Transform for FieldDropper {
    fn name(&self) -> &str {
        "drop_fields"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        Ok(input
            .into_iter()
            .map(|mut record| {
                for field in &self.fields {
                    record.remove(field);
                }
                record
            })
            .collect())
    }
}
