//! Loader trait for loading data to destinations

use super::Record;
use eyre::Result;

/// Loader trait for writing a dataset to a destination
///
/// Implementors define how to write records to destinations like:
/// - CSV files
/// - JSON files
/// - Counting sinks (tests)
///
/// A loader is all-or-nothing from the orchestrator's point of view:
/// either the destination ends up containing the full dataset, or the
/// call returns an error. A failed write may leave a partial file at the
/// destination, but a loader must never report success on a partial
/// write.
///
/// # Example
/// ```
/// use datapipe::etl::{Loader, Record};
/// use eyre::Result;
///
/// struct CountingLoader;
///
/// impl Loader for CountingLoader {
///     fn load(&self, dataset: &[Record]) -> Result<usize> {
///         Ok(dataset.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// Load the dataset to the destination
    ///
    /// Returns the number of records written
    ///
    /// # Errors
    /// Returns an error if loading fails (permissions, disk, malformed
    /// destination spec, partial write)
    fn load(&self, dataset: &[Record]) -> Result<usize>;
}
