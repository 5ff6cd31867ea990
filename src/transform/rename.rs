//! Field renaming transform

use crate::config::{Params, params};
use crate::etl::{Dataset, Transform};
use eyre::Result;

/// Transform that renames a field in every record
///
/// Records without the `from` field pass through untouched. If a `to`
/// field already exists it is overwritten.
pub struct RenameField {
    from: String,
    to: String,
}

impl RenameField {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Build from registry params. Required: `from`, `to`.
    pub fn from_params(p: &Params) -> Result<Self> {
        params::warn_unknown("rename_field", p, &["from", "to"]);
        Ok(Self::new(
            params::require_str(p, "from")?,
            params::require_str(p, "to")?,
        ))
    }
}

impl Transform for RenameField {
    fn name(&self) -> &str {
        "rename_field"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        Ok(input
            .into_iter()
            .map(|mut record| {
                if let Some(value) = record.remove(&self.from) {
                    record.insert(self.to.clone(), value);
                }
                record
            })
            .collect())
    }
}
