//! Case-folding transforms for string fields

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::Result;
use serde_json::Value;

/// Transform that upper-cases a string field
///
/// Non-string and absent values pass through untouched; only the named
/// field is modified.
///
/// # Example
/// ```
/// use datapipe::transform::Uppercase;
/// use datapipe::etl::Transform;
/// use serde_json::json;
///
/// let step = Uppercase::new("name");
/// let input = vec![json!({"name": "ada", "age": 36}).as_object().unwrap().clone()];
///
/// let output = step.apply(input).unwrap();
/// assert_eq!(output[0]["name"], "ADA");
/// assert_eq!(output[0]["age"], 36);
/// ```
pub struct Uppercase {
    field: String,
}

impl Uppercase {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build from registry params. Required: `field`.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("uppercase", p, &["field"]);
        Ok(Self::new(params::require_str(p, "field")?))
    }
}

impl Transform for Uppercase {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        Ok(fold_case(input, &self.field, true))
    }
}

/// Transform that lower-cases a string field
pub struct Lowercase {
    field: String,
}

impl Lowercase {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build from registry params. Required: `field`.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("lowercase", p, &["field"]);
        Ok(Self::new(params::require_str(p, "field")?))
    }
}

impl Transform for Lowercase {
    fn name(&self) -> &str {
        "lowercase"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        Ok(fold_case(input, &self.field, false))
    }
}

fn fold_case(input: Dataset, field: &str, upper: bool) -> Dataset {
    input
        .into_iter()
        .map(|mut record| {
            if let Some(Value::String(s)) = record.get(field) {
                let folded = if upper {
                    s.to_uppercase()
                } else {
                    s.to_lowercase()
                };
                record.insert(field.to_string(), Value::String(folded));
            }
            record
        })
        .collect()
}
