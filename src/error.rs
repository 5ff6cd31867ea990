//! Pipeline error taxonomy
//!
//! Every failure surfaced by a pipeline run is tagged with the stage it
//! occurred in, wrapping the underlying adapter error without discarding it.

use thiserror::Error;

/// Identifies which pipeline stage a failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Configuration loading or validation, before any I/O
    Configure,
    /// Reading the dataset from the source
    Extract,
    /// Applying a transform step
    Transform,
    /// Writing the dataset to the destination
    Load,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Configure => write!(f, "configure"),
            Stage::Extract => write!(f, "extract"),
            Stage::Transform => write!(f, "transform"),
            Stage::Load => write!(f, "load"),
        }
    }
}

/// Error produced by pipeline configuration or execution
///
/// The orchestrator performs no recovery or retries; it only tags the
/// underlying cause with the stage that failed and, for transforms, the
/// step index and name.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad or missing configuration, detected before any I/O
    #[error("configuration error: {0}")]
    Config(String),

    /// The source was unreachable, malformed, or unexpectedly empty
    #[error("extract stage failed: {cause}")]
    Extract { cause: eyre::Report },

    /// A transform step failed; remaining steps and the loader never ran
    #[error("transform step {index} '{name}' failed: {cause}")]
    Transform {
        index: usize,
        name: String,
        cause: eyre::Report,
    },

    /// The destination could not be written
    #[error("load stage failed: {cause}")]
    Load { cause: eyre::Report },
}

impl PipelineError {
    /// The stage this error occurred in
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Config(_) => Stage::Configure,
            PipelineError::Extract { .. } => Stage::Extract,
            PipelineError::Transform { .. } => Stage::Transform,
            PipelineError::Load { .. } => Stage::Load,
        }
    }
}
