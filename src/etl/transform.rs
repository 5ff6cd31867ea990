//! Transform trait for dataset transformation

use super::Dataset;
use eyre::Result;

/// Transform trait for reshaping a dataset
///
/// Implementors define one step in a pipeline's transform chain:
/// - Field cleanup (dropping, renaming)
/// - Row selection (filtering, truncation)
/// - Value derivation (case folding, arithmetic)
///
/// A transform takes ownership of its input and returns a new dataset;
/// callers that need the input afterwards should clone it first. Steps
/// must be pure functions of (input, construction params) with no
/// reliance on process-wide mutable state, so applying the same step to
/// the same dataset always yields the same result.
///
/// # Example
/// ```
/// use datapipe::etl::{Dataset, Transform};
/// use eyre::Result;
///
/// struct FieldDropper {
///     fields: Vec<String>,
/// }
///
/// impl Transform for FieldDropper {
///     fn name(&self) -> &str {
///         "drop_fields"
///     }
///
///     fn apply(&self, input: Dataset) -> Result<Dataset> {
///         Ok(input
///             .into_iter()
///             .map(|mut record| {
///                 for field in &self.fields {
///                     record.remove(field);
///                 }
///                 record
///             })
///             .collect())
///     }
/// }
/// ```
pub trait Transform: Send + Sync {
    /// The configured name of this step, used in logs and error context
    fn name(&self) -> &str;

    /// Apply this step to a dataset, producing the next dataset
    ///
    /// # Errors
    /// Returns an error if the step cannot be applied (missing field,
    /// type mismatch, etc.)
    fn apply(&self, input: Dataset) -> Result<Dataset>;
}

impl std::fmt::Debug for dyn Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Transform")
    }
}

/// Identity transform that passes the dataset through unchanged
///
/// Use this when a pipeline slot requires a transform but the data
/// should not be modified.
#[derive(Debug, Default)]
pub struct IdentityTransform;

impl IdentityTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for IdentityTransform {
    fn name(&self) -> &str {
        "identity"
    }

    fn apply(&self, input: Dataset) -> Result<Dataset> {
        Ok(input)
    }
}
