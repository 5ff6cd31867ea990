//! Extractor trait for data extraction from various sources

use super::Dataset;
use eyre::Result;

/// Extractor trait for extracting a dataset from a source
///
/// Implementors define how to read records from sources like:
/// - CSV files
/// - JSON files
/// - In-memory fixtures (tests)
///
/// Extraction must be deterministic for an unchanged source and must
/// return an error rather than a malformed dataset.
///
/// # Example
/// ```
/// use datapipe::etl::{Dataset, Extractor};
/// use eyre::Result;
///
/// struct FixtureExtractor {
///     records: Dataset,
/// }
///
/// impl Extractor for FixtureExtractor {
///     fn extract(&self) -> Result<Dataset> {
///         Ok(self.records.clone())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Extract all records from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, parsing, etc.)
    fn extract(&self) -> Result<Dataset>;
}

impl std::fmt::Debug for dyn Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Extractor")
    }
}
