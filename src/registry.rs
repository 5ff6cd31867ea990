//! Capability registry
//!
//! Maps configuration names to concrete stage implementations. The
//! registry is populated once at process start and read-only afterwards:
//! every lookup goes through a shared reference, so concurrent pipeline
//! runs need no locking.

use crate::config::Params;
use crate::etl::{Extractor, Loader, Transform};
use crate::storage::{CsvReader, CsvWriter, JsonReader, JsonWriter};
use crate::transform::{
    Dedupe, FieldDropper, FillMissing, FilterRows, GroupBy, Head, Lowercase, Multiply, Normalize,
    RenameField, Uppercase,
};
use eyre::{Result, eyre};
use std::collections::HashMap;

type ExtractorFactory = Box<dyn Fn(&Params) -> Result<Box<dyn Extractor>> + Send + Sync>;
type TransformFactory = Box<dyn Fn(&Params) -> Result<Box<dyn Transform>> + Send + Sync>;
type LoaderFactory = Box<dyn Fn(&Params) -> Result<Box<dyn Loader>> + Send + Sync>;

/// Lookup table from configuration name to stage factory
///
/// Ships with `csv` and `json` extractors/loaders and the built-in
/// transform set, and stays open to additional kinds via the
/// `register_*` methods.
///
/// # Example
/// ```
/// use datapipe::registry::Registry;
/// use datapipe::etl::IdentityTransform;
///
/// let mut registry = Registry::builtin();
/// registry.register_transform("identity", |_params| {
///     Ok(Box::new(IdentityTransform::new()))
/// });
///
/// assert!(registry.has_transform("identity"));
/// assert!(registry.has_extractor("csv"));
/// ```
pub struct Registry {
    extractors: HashMap<String, ExtractorFactory>,
    transforms: HashMap<String, TransformFactory>,
    loaders: HashMap<String, LoaderFactory>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            transforms: HashMap::new(),
            loaders: HashMap::new(),
        }
    }

    /// Create a registry with all built-in capabilities registered
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register_extractor("csv", |params| {
            Ok(Box::new(CsvReader::from_params(params)?))
        });
        registry.register_extractor("json", |params| {
            Ok(Box::new(JsonReader::from_params(params)?))
        });

        registry.register_loader("csv", |params| {
            Ok(Box::new(CsvWriter::from_params(params)?))
        });
        registry.register_loader("json", |params| {
            Ok(Box::new(JsonWriter::from_params(params)?))
        });

        registry.register_transform("uppercase", |params| {
            Ok(Box::new(Uppercase::from_params(params)?))
        });
        registry.register_transform("lowercase", |params| {
            Ok(Box::new(Lowercase::from_params(params)?))
        });
        registry.register_transform("rename_field", |params| {
            Ok(Box::new(RenameField::from_params(params)?))
        });
        registry.register_transform("drop_fields", |params| {
            Ok(Box::new(FieldDropper::from_params(params)?))
        });
        registry.register_transform("filter", |params| {
            Ok(Box::new(FilterRows::from_params(params)?))
        });
        registry.register_transform("multiply", |params| {
            Ok(Box::new(Multiply::from_params(params)?))
        });
        registry.register_transform("normalize", |params| {
            Ok(Box::new(Normalize::from_params(params)?))
        });
        registry.register_transform("head", |params| {
            Ok(Box::new(Head::from_params(params)?))
        });
        registry.register_transform("dedupe", |params| {
            Ok(Box::new(Dedupe::from_params(params)?))
        });
        registry.register_transform("group_by", |params| {
            Ok(Box::new(GroupBy::from_params(params)?))
        });
        registry.register_transform("fill_missing", |params| {
            Ok(Box::new(FillMissing::from_params(params)?))
        });

        registry
    }

    /// Register an extractor kind
    pub fn register_extractor(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn(&Params) -> Result<Box<dyn Extractor>> + Send + Sync + 'static,
    ) {
        self.extractors.insert(kind.into(), Box::new(factory));
    }

    /// Register a transform name
    pub fn register_transform(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&Params) -> Result<Box<dyn Transform>> + Send + Sync + 'static,
    ) {
        self.transforms.insert(name.into(), Box::new(factory));
    }

    /// Register a loader kind
    pub fn register_loader(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn(&Params) -> Result<Box<dyn Loader>> + Send + Sync + 'static,
    ) {
        self.loaders.insert(kind.into(), Box::new(factory));
    }

    pub fn has_extractor(&self, kind: &str) -> bool {
        self.extractors.contains_key(kind)
    }

    pub fn has_transform(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    pub fn has_loader(&self, kind: &str) -> bool {
        self.loaders.contains_key(kind)
    }

    /// Build an extractor for the given kind
    ///
    /// # Errors
    /// Returns an error if the kind is unknown or its factory rejects
    /// the params.
    pub fn build_extractor(&self, kind: &str, params: &Params) -> Result<Box<dyn Extractor>> {
        let factory = self
            .extractors
            .get(kind)
            .ok_or_else(|| eyre!("unknown source kind '{kind}'"))?;
        factory(params)
    }

    /// Build a transform step for the given name
    pub fn build_transform(&self, name: &str, params: &Params) -> Result<Box<dyn Transform>> {
        let factory = self
            .transforms
            .get(name)
            .ok_or_else(|| eyre!("unknown transform '{name}'"))?;
        factory(params)
    }

    /// Build a loader for the given kind
    pub fn build_loader(&self, kind: &str, params: &Params) -> Result<Box<dyn Loader>> {
        let factory = self
            .loaders
            .get(kind)
            .ok_or_else(|| eyre!("unknown destination kind '{kind}'"))?;
        factory(params)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
