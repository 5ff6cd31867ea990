//! Group-and-aggregate transform

use crate::config::{Params, params};
use crate::etl::{Dataset, Record, Transform};
use eyre::{Result, bail, eyre};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

/// Aggregation function for [`GroupBy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Sum,
    Min,
    Max,
    Mean,
    Count,
    First,
}

impl AggFunc {
    fn name(&self) -> &'static str {
        match self {
            AggFunc::Sum => "sum",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::Mean => "mean",
            AggFunc::Count => "count",
            AggFunc::First => "first",
        }
    }
}

impl FromStr for AggFunc {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(AggFunc::Sum),
            "min" => Ok(AggFunc::Min),
            "max" => Ok(AggFunc::Max),
            "mean" => Ok(AggFunc::Mean),
            "count" => Ok(AggFunc::Count),
            "first" => Ok(AggFunc::First),
            other => Err(eyre!(
                "unknown aggregation '{other}' (expected sum, min, max, mean, count, first)"
            )),
        }
    }
}

/// Transform that groups records by key fields and aggregates the rest
///
/// Each output record carries the group-key fields plus one
/// `<field>_<func>` field per configured aggregation. Groups appear in
/// first-seen order; records missing a key field group under null.
/// `count` counts non-null values, `first` takes the first present
/// value of any type, and the numeric functions error on non-numeric
/// values. With no aggregations the result is the distinct key rows.
///
/// # Example
/// ```
/// use datapipe::transform::{AggFunc, GroupBy};
/// use datapipe::etl::Transform;
/// use serde_json::json;
///
/// let step = GroupBy::new(vec!["city"], vec![("salary", AggFunc::Mean)]);
/// let input = vec![
///     json!({"city": "tokyo", "salary": 1000}).as_object().unwrap().clone(),
///     json!({"city": "tokyo", "salary": 2000}).as_object().unwrap().clone(),
///     json!({"city": "paris", "salary": 900}).as_object().unwrap().clone(),
/// ];
///
/// let output = step.apply(input).unwrap();
/// assert_eq!(output.len(), 2);
/// assert_eq!(output[0]["city"], "tokyo");
/// assert_eq!(output[0]["salary_mean"], 1500.0);
/// ```
pub struct GroupBy {
    by: Vec<String>,
    aggregations: Vec<(String, AggFunc)>,
}

impl GroupBy {
    pub fn new(by: Vec<&str>, aggregations: Vec<(&str, AggFunc)>) -> Self {
        Self {
            by: by.iter().map(|s| s.to_string()).collect(),
            aggregations: aggregations
                .iter()
                .map(|(field, func)| (field.to_string(), *func))
                .collect(),
        }
    }

    /// Build from registry params
    ///
    /// Required: `by` (list of strings). Optional: `aggregate` (map of
    /// field name to aggregation function).
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("group_by", p, &["by", "aggregate"]);
        let by = params::require_str_list(p, "by")?;
        if by.is_empty() {
            return Err(eyre!("param 'by' must name at least one field"));
        }

        let mut aggregations = Vec::new();
        if let Some(value) = p.get("aggregate") {
            let map = value
                .as_object()
                .ok_or_else(|| eyre!("param 'aggregate' must be a map of field to function"))?;
            for (field, func) in map {
                let func = func
                    .as_str()
                    .ok_or_else(|| eyre!("aggregation for '{field}' must be a string"))?
                    .parse()?;
                aggregations.push((field.clone(), func));
            }
        }

        Ok(Self { by, aggregations })
    }
}

impl Transform for GroupBy {
    fn name(&self) -> &str {
        "group_by"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(Record, Dataset)> = Vec::new();

        for record in input {
            let mut key_record = Record::new();
            for field in &self.by {
                key_record.insert(
                    field.clone(),
                    record.get(field).cloned().unwrap_or(Value::Null),
                );
            }
            // Key records are maps, not hashable; key on the serialized form
            let key = serde_json::to_string(&key_record)?;
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    index.insert(key, groups.len());
                    groups.push((key_record, Dataset::new()));
                    groups.len() - 1
                }
            };
            groups[slot].1.push(record);
        }

        let mut output = Dataset::with_capacity(groups.len());
        for (key_record, members) in groups {
            let mut out = key_record;
            for (field, func) in &self.aggregations {
                out.insert(
                    format!("{field}_{}", func.name()),
                    aggregate(field, *func, &members)?,
                );
            }
            output.push(out);
        }

        Ok(output)
    }
}

fn aggregate(field: &str, func: AggFunc, members: &[Record]) -> Result<Value> {
    match func {
        AggFunc::Count => {
            let count = members
                .iter()
                .filter(|r| r.get(field).is_some_and(|v| !v.is_null()))
                .count();
            Ok(Value::from(count))
        }
        AggFunc::First => Ok(members
            .iter()
            .filter_map(|r| r.get(field))
            .find(|v| !v.is_null())
            .cloned()
            .unwrap_or(Value::Null)),
        AggFunc::Sum | AggFunc::Mean | AggFunc::Min | AggFunc::Max => {
            let mut numbers = Vec::new();
            for record in members {
                match record.get(field) {
                    None | Some(Value::Null) => {}
                    Some(Value::Number(n)) => numbers.push(n),
                    Some(other) => bail!("field '{field}' is not numeric: {other}"),
                }
            }
            numeric_aggregate(field, func, &numbers)
        }
    }
}

fn numeric_aggregate(field: &str, func: AggFunc, numbers: &[&serde_json::Number]) -> Result<Value> {
    match func {
        AggFunc::Sum => {
            // Keep integral sums integral while they fit in i64
            let int_sum = numbers
                .iter()
                .try_fold(0i64, |acc, n| n.as_i64().and_then(|i| acc.checked_add(i)));
            if let Some(sum) = int_sum {
                return Ok(Value::from(sum));
            }
            let sum: f64 = numbers.iter().filter_map(|n| n.as_f64()).sum();
            serde_json::Number::from_f64(sum)
                .map(Value::Number)
                .ok_or_else(|| eyre!("sum of field '{field}' is not representable"))
        }
        AggFunc::Mean => {
            if numbers.is_empty() {
                return Ok(Value::Null);
            }
            let sum: f64 = numbers.iter().filter_map(|n| n.as_f64()).sum();
            serde_json::Number::from_f64(sum / numbers.len() as f64)
                .map(Value::Number)
                .ok_or_else(|| eyre!("mean of field '{field}' is not representable"))
        }
        AggFunc::Min | AggFunc::Max => {
            let extreme = numbers.iter().copied().reduce(|a, b| {
                let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                let pick_b = match func {
                    AggFunc::Min => y < x,
                    _ => y > x,
                };
                if pick_b { b } else { a }
            });
            Ok(extreme
                .map(|n| Value::Number(n.clone()))
                .unwrap_or(Value::Null))
        }
        _ => unreachable!("non-numeric aggregation"),
    }
}
