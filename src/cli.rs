//! CLI helper functions

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::etl::{Pipeline, RunReport};
use crate::registry::Registry;
use owo_colors::OwoColorize;
use std::path::Path;

/// Load a configuration file, configure one pipeline, and run it
///
/// Separated from `main` so the wiring is testable without the binary.
///
/// # Errors
/// Returns [`PipelineError::Config`] if the document cannot be loaded or
/// names unknown capabilities. Stage failures during the run do not
/// return `Err`; they are reported inside the [`RunReport`].
pub fn run_pipeline(config_path: impl AsRef<Path>) -> Result<RunReport, PipelineError> {
    let config_path = config_path.as_ref();

    log::info!("Loading configuration from {}", config_path.display());
    let config = PipelineConfig::from_path(config_path)?;

    let registry = Registry::builtin();
    let pipeline = Pipeline::configure(&registry, &config)?;

    Ok(pipeline.run())
}

/// Print a human-readable run summary to stdout
pub fn print_summary(report: &RunReport) {
    println!();
    println!(
        "  {} {} record(s)",
        "extract:".bright_white(),
        report.extracted
    );
    for (index, step) in report.transformed.iter().enumerate() {
        println!(
            "  {} {} record(s)",
            format!("transform[{index}] {}:", step.name).bright_white(),
            step.count
        );
    }

    match &report.failure {
        None => {
            println!("  {} {} record(s)", "load:".bright_white(), report.loaded);
            println!();
            println!(
                "{} Pipeline complete, {} record(s) loaded",
                "✓".green(),
                report.loaded
            );
        }
        Some(error) => {
            println!();
            println!(
                "{} Pipeline failed at {} stage: {}",
                "✗".red(),
                error.stage().to_string().cyan(),
                error
            );
        }
    }
}
