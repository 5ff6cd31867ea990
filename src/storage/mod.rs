//! File-based storage adapters
//!
//! This module holds the built-in extractors and loaders for local
//! files: CSV (delimited text, header row defines field names) and JSON
//! (array of objects). Adapters own their file handles for the duration
//! of a single call and release them on every exit path.

mod csv;
mod json;

pub use csv::{CsvReader, CsvWriter};
pub use json::{JsonReader, JsonWriter};
