use anyhow::Context;
use chrono::Local;
use clap::Parser;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use configuration::{Overrides, load_config};
use presentation::headline_figures;
use sim_analyzer::{Pipeline, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;

/// The main entry point for the simulation analyzer.
fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), &cli.overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match configuration::init_tracing(&config.output_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Starting HFT Market Maker Analysis...");
    let pipeline = Pipeline::new(config);
    match pipeline
        .run(Local::now().naive_local())
        .context("Analysis aborted")
    {
        Ok(outcome) => {
            print_summary(&outcome, &pipeline);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Analyzes the CSV output of a market-making simulation.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./analyzer.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

/// Prints the headline figures of a finished run.
fn print_summary(outcome: &RunOutcome, pipeline: &Pipeline) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ANALYSIS COMPLETED", ""]);

    for (label, value) in headline_figures(&outcome.report) {
        table.add_row(vec![label.to_string(), value]);
    }
    table.add_row(vec![
        "Output directory".to_string(),
        pipeline.config().output_dir.display().to_string(),
    ]);
    if let Some(path) = &outcome.report_path {
        table.add_row(vec!["Report".to_string(), path.display().to_string()]);
    }
    table.add_row(vec!["Charts".to_string(), outcome.charts.len().to_string()]);

    println!("{table}");
}
