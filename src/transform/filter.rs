//! Row filtering transform

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::{Result, eyre};
use serde_json::Value;
use std::str::FromStr;

/// Comparison operator for [`FilterRows`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl FromStr for FilterOp {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "eq" => Ok(FilterOp::Eq),
            "ne" => Ok(FilterOp::Ne),
            "gt" => Ok(FilterOp::Gt),
            "lt" => Ok(FilterOp::Lt),
            "ge" => Ok(FilterOp::Ge),
            "le" => Ok(FilterOp::Le),
            other => Err(eyre!(
                "unknown filter op '{other}' (expected eq, ne, gt, lt, ge, le)"
            )),
        }
    }
}

/// Transform that keeps only records matching a field comparison
///
/// Comparison is numeric when both the field value and the configured
/// value are numbers; otherwise only `eq`/`ne` match, by exact value
/// equality. Records without the field are dropped.
///
/// # Example
/// ```
/// use datapipe::transform::{FilterOp, FilterRows};
/// use datapipe::etl::Transform;
/// use serde_json::json;
///
/// let adults = FilterRows::new("age", FilterOp::Gt, json!(18));
/// let input = vec![
///     json!({"name": "ada", "age": 36}).as_object().unwrap().clone(),
///     json!({"name": "kid", "age": 9}).as_object().unwrap().clone(),
/// ];
///
/// let output = adults.apply(input).unwrap();
/// assert_eq!(output.len(), 1);
/// assert_eq!(output[0]["name"], "ada");
/// ```
pub struct FilterRows {
    field: String,
    op: FilterOp,
    value: Value,
}

impl FilterRows {
    pub fn new(field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Build from registry params. Required: `field`, `op`, `value`.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("filter", p, &["field", "op", "value"]);
        let field = params::require_str(p, "field")?;
        let op = params::require_str(p, "op")?.parse()?;
        let value = p
            .get("value")
            .ok_or_else(|| eyre!("missing required param 'value'"))?
            .clone();
        Ok(Self::new(field, op, value))
    }

    fn matches(&self, value: &Value) -> bool {
        if let (Some(a), Some(b)) = (value.as_f64(), self.value.as_f64()) {
            return match self.op {
                FilterOp::Eq => a == b,
                FilterOp::Ne => a != b,
                FilterOp::Gt => a > b,
                FilterOp::Lt => a < b,
                FilterOp::Ge => a >= b,
                FilterOp::Le => a <= b,
            };
        }
        match self.op {
            FilterOp::Eq => value == &self.value,
            FilterOp::Ne => value != &self.value,
            _ => false,
        }
    }
}

impl Transform for FilterRows {
    fn name(&self) -> &str {
        "filter"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        Ok(input
            .into_iter()
            .filter(|record| record.get(&self.field).is_some_and(|v| self.matches(v)))
            .collect())
    }
}
