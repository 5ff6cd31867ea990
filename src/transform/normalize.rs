//! Min-max normalization transform

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::Result;
use serde_json::Value;

/// Transform that min-max scales a numeric field into `<field>_normalized`
///
/// The scaled value lies in 0..=1 across the dataset; a constant column
/// normalizes to 0.0. Records whose field is absent or non-numeric get
/// no normalized field.
pub struct Normalize {
    field: String,
}

impl Normalize {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build from registry params. Required: `field`.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("normalize", p, &["field"]);
        Ok(Self::new(params::require_str(p, "field")?))
    }
}

impl Transform for Normalize {
    fn name(&self) -> &str {
        "normalize"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        let values: Vec<f64> = input
            .iter()
            .filter_map(|r| r.get(&self.field).and_then(Value::as_f64))
            .collect();

        let (Some(min), Some(max)) = (
            values.iter().copied().reduce(f64::min),
            values.iter().copied().reduce(f64::max),
        ) else {
            return Ok(input);
        };

        let target = format!("{}_normalized", self.field);
        let range = max - min;

        Ok(input
            .into_iter()
            .map(|mut record| {
                if let Some(value) = record.get(&self.field).and_then(Value::as_f64) {
                    let scaled = if range == 0.0 {
                        0.0
                    } else {
                        (value - min) / range
                    };
                    if let Some(n) = serde_json::Number::from_f64(scaled) {
                        record.insert(target.clone(), Value::Number(n));
                    }
                }
                record
            })
            .collect())
    }
}
