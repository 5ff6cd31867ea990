//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transform};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Stage};
use crate::registry::Registry;
use eyre::eyre;

/// Record count observed after one transform step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCount {
    /// Configured name of the step
    pub name: String,
    /// Records in the dataset after the step ran
    pub count: usize,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// Summary of one pipeline run
///
/// Counts cover the stages that actually ran; on failure the report
/// carries the first failing stage and its wrapped cause, and counts for
/// later stages stay at zero.
#[derive(Debug)]
pub struct RunReport {
    pub status: RunStatus,
    /// Records produced by the extractor
    pub extracted: usize,
    /// Record count after each transform step, in configured order
    pub transformed: Vec<StageCount>,
    /// Records written by the loader
    pub loaded: usize,
    /// The error that stopped the run, if any
    pub failure: Option<PipelineError>,
}

impl RunReport {
    fn empty() -> Self {
        Self {
            status: RunStatus::Failed,
            extracted: 0,
            transformed: Vec::new(),
            loaded: 0,
            failure: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    /// The stage the run stopped at, if it failed
    pub fn failed_stage(&self) -> Option<Stage> {
        self.failure.as_ref().map(|e| e.stage())
    }
}

/// ETL pipeline that orchestrates Extract, Transform, and Load stages
///
/// A pipeline is configured once from a [`PipelineConfig`] resolved
/// against a [`Registry`], then run any number of times. Each run is an
/// independent re-execution against the same configuration: the three
/// stages execute strictly in sequence on the calling thread, a stage
/// failure stops the run immediately, and no retries are attempted.
///
/// # Example
/// ```no_run
/// use datapipe::config::PipelineConfig;
/// use datapipe::etl::Pipeline;
/// use datapipe::registry::Registry;
///
/// # fn example() -> Result<(), datapipe::error::PipelineError> {
/// let registry = Registry::builtin();
/// let config = PipelineConfig::from_path("pipeline.yaml")?;
///
/// let pipeline = Pipeline::configure(&registry, &config)?;
/// let report = pipeline.run();
/// println!("loaded {} record(s)", report.loaded);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    extractor: Box<dyn Extractor>,
    transforms: Vec<Box<dyn Transform>>,
    loader: Box<dyn Loader>,
    allow_empty: bool,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("transforms", &self.transforms.len())
            .field("allow_empty", &self.allow_empty)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Assemble a pipeline directly from stage implementations
    ///
    /// Useful for embedding and tests; configuration-driven callers
    /// should use [`Pipeline::configure`].
    pub fn new(
        extractor: Box<dyn Extractor>,
        transforms: Vec<Box<dyn Transform>>,
        loader: Box<dyn Loader>,
    ) -> Self {
        Self {
            extractor,
            transforms,
            loader,
            allow_empty: true,
        }
    }

    /// Disallow or allow an empty extraction result (default: allowed)
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Resolve a configuration into a runnable pipeline
    ///
    /// Looks up the source kind, every transform name, and the
    /// destination kind in the registry, and lets each factory validate
    /// its required params. No I/O happens here.
    ///
    /// # Errors
    /// Returns [`PipelineError::Config`] if any name is unrecognized or
    /// a required param is missing or mistyped.
    pub fn configure(registry: &Registry, config: &PipelineConfig) -> Result<Self, PipelineError> {
        let extractor = registry
            .build_extractor(&config.source.kind, &config.source.params)
            .map_err(|e| PipelineError::Config(format!("source: {e}")))?;

        let mut transforms = Vec::with_capacity(config.transforms.len());
        for (index, step) in config.transforms.iter().enumerate() {
            let transform = registry
                .build_transform(&step.name, &step.params)
                .map_err(|e| PipelineError::Config(format!("transforms[{index}]: {e}")))?;
            transforms.push(transform);
        }

        let loader = registry
            .build_loader(&config.destination.kind, &config.destination.params)
            .map_err(|e| PipelineError::Config(format!("destination: {e}")))?;

        Ok(Self {
            extractor,
            transforms,
            loader,
            allow_empty: config.source.allow_empty,
        })
    }

    /// Run the complete ETL pipeline
    ///
    /// Stages:
    /// 1. Extract the dataset from the source
    /// 2. Apply each transform step in configured order
    /// 3. Load the final dataset to the destination
    ///
    /// Always returns a report; on failure the report carries the first
    /// failing stage and its cause, and later stages never ran.
    pub fn run(&self) -> RunReport {
        log::info!("Starting pipeline run");
        let mut report = RunReport::empty();

        match self.run_stages(&mut report) {
            Ok(()) => {
                report.status = RunStatus::Succeeded;
                log::info!(
                    "Pipeline succeeded: {} extracted, {} transform step(s), {} loaded",
                    report.extracted,
                    report.transformed.len(),
                    report.loaded
                );
            }
            Err(error) => {
                report.status = RunStatus::Failed;
                log::error!("Pipeline failed at {} stage: {}", error.stage(), error);
                report.failure = Some(error);
            }
        }

        report
    }

    fn run_stages(&self, report: &mut RunReport) -> Result<(), PipelineError> {
        let mut dataset = self
            .extractor
            .extract()
            .map_err(|cause| PipelineError::Extract { cause })?;

        if dataset.is_empty() && !self.allow_empty {
            return Err(PipelineError::Extract {
                cause: eyre!("source produced no records and allow_empty is false"),
            });
        }

        report.extracted = dataset.len();
        log::info!("extract: {} record(s)", dataset.len());

        for (index, step) in self.transforms.iter().enumerate() {
            dataset = step
                .apply(dataset)
                .map_err(|cause| PipelineError::Transform {
                    index,
                    name: step.name().to_string(),
                    cause,
                })?;
            report.transformed.push(StageCount {
                name: step.name().to_string(),
                count: dataset.len(),
            });
            log::info!("transform[{}] {}: {} record(s)", index, step.name(), dataset.len());
        }

        let loaded = self
            .loader
            .load(&dataset)
            .map_err(|cause| PipelineError::Load { cause })?;

        report.loaded = loaded;
        log::info!("load: {} record(s)", loaded);

        Ok(())
    }
}
