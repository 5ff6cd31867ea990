//! Duplicate removal transform

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::Result;
use std::collections::HashSet;

/// Transform that drops exact-duplicate records, keeping the first
///
/// Two records are duplicates when every field and value matches.
pub struct Dedupe;

impl Dedupe {
    pub fn new() -> Self {
        Self
    }

    /// Build from registry params. No required params.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("dedupe", p, &[]);
        Ok(Self::new())
    }
}

impl Default for Dedupe {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Dedupe {
    fn name(&self) -> &str {
        "dedupe"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        let mut seen = HashSet::new();
        let mut output = Dataset::with_capacity(input.len());

        for record in input {
            // Records are maps, not hashable; key on the serialized form
            let key = serde_json::to_string(&record)?;
            if seen.insert(key) {
                output.push(record);
            }
        }

        Ok(output)
    }
}
