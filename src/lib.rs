//! Datapipe
//!
//! A config-driven ETL runner for personal CSV/JSON data files

pub mod cli;
pub mod config;
pub mod error;
pub mod etl;
pub mod registry;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use error::{PipelineError, Stage};
pub use etl::{Dataset, Extractor, Loader, Pipeline, Record, RunReport, RunStatus, Transform};
pub use registry::Registry;
pub use storage::{CsvReader, CsvWriter, JsonReader, JsonWriter};
