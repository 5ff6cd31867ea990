//! Row truncation transform

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::Result;

/// Transform that keeps only the first N records
///
/// Dataset order is significant here; the orchestrator never reorders,
/// so `head` sees records in source order (or the order produced by
/// earlier steps).
pub struct Head {
    count: usize,
}

impl Head {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Build from registry params. Required: `count`.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("head", p, &["count"]);
        Ok(Self::new(params::require_usize(p, "count")?))
    }
}

impl Transform for Head {
    fn name(&self) -> &str {
        "head"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        Ok(input.into_iter().take(self.count).collect())
    }
}
