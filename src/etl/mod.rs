//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the record model and trait definitions for building
//! data pipelines that extract a dataset from a source, transform it through
//! an ordered list of steps, and load it to a destination.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::{Pipeline, RunReport, RunStatus, StageCount};
pub use transform::{IdentityTransform, Transform};

/// One record: a mapping from field name to JSON value
///
/// No schema is enforced; fields may vary in presence and type across
/// records within the same dataset.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// An ordered sequence of records flowing between pipeline stages
pub type Dataset = Vec<Record>;
