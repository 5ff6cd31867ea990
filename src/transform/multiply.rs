//! Calculated-column transform

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::{Result, bail};
use serde_json::Value;

/// Transform that multiplies a numeric field by a constant factor
///
/// Writes the product to `target` (defaults to the source field).
/// Integer inputs with an integral factor stay integers while the
/// product fits in i64, then fall back to floating point; null or
/// absent fields pass through untouched; a non-numeric value is an
/// error.
pub struct Multiply {
    field: String,
    factor: f64,
    target: String,
}

impl Multiply {
    pub fn new(field: impl Into<String>, factor: f64) -> Self {
        let field = field.into();
        Self {
            target: field.clone(),
            field,
            factor,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Build from registry params
    ///
    /// Required: `field`, `factor`. Optional: `target`.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("multiply", p, &["field", "factor", "target"]);
        let mut step = Self::new(
            params::require_str(p, "field")?,
            params::require_f64(p, "factor")?,
        );
        if let Some(target) = params::optional_str(p, "target")? {
            step = step.with_target(target);
        }
        Ok(step)
    }

    fn product(&self, value: &Value) -> Result<Option<Value>> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => {
                // Integer path only when the factor is integral, fits in
                // i64, and the checked product does not overflow;
                // otherwise fall through to f64.
                if self.factor.fract() == 0.0 && self.factor.abs() <= i64::MAX as f64 {
                    if let Some(product) =
                        n.as_i64().and_then(|i| i.checked_mul(self.factor as i64))
                    {
                        return Ok(Some(Value::from(product)));
                    }
                }
                let product = n
                    .as_f64()
                    .map(|f| f * self.factor)
                    .and_then(serde_json::Number::from_f64);
                match product {
                    Some(n) => Ok(Some(Value::Number(n))),
                    None => bail!("product of field '{}' is not representable", self.field),
                }
            }
            other => bail!("field '{}' is not numeric: {other}", self.field),
        }
    }
}

impl Transform for Multiply {
    fn name(&self) -> &str {
        "multiply"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        input
            .into_iter()
            .map(|mut record| {
                if let Some(value) = record.get(&self.field) {
                    if let Some(product) = self.product(value)? {
                        record.insert(self.target.clone(), product);
                    }
                }
                Ok(record)
            })
            .collect()
    }
}
