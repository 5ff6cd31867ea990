use clap::{Parser, builder::styling};
use datapipe::cli;
use std::process::ExitCode;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Datapipe: run one config-driven ETL pipeline over a personal data file
#[derive(Parser)]
#[command(name = "dpipe", version, styles = STYLES)]
struct Cli {
    /// Pipeline configuration document (YAML or JSON)
    #[arg(default_value = "pipeline.yaml")]
    config: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli::run_pipeline(&cli.config) {
        Ok(report) => {
            cli::print_summary(&report);
            match report.is_success() {
                true => ExitCode::SUCCESS,
                false => ExitCode::FAILURE,
            }
        }
        Err(error) => {
            log::error!("{error}");
            eprintln!("✗ Pipeline failed at {} stage: {error}", error.stage());
            ExitCode::FAILURE
        }
    }
}
