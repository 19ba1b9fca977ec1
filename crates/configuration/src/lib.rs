use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{AnalyzerConfig, Overrides, ReportSettings, SourcePatterns};

/// Name (without extension) of the configuration file picked up from the
/// working directory when no explicit path is given.
pub const DEFAULT_CONFIG_NAME: &str = "analyzer";

/// Loads the analyzer configuration.
///
/// Sources are layered from lowest to highest priority: built-in defaults, the
/// TOML file (`path`, or an optional `analyzer.toml` in the working directory),
/// `ANALYZER_*` environment variables, and finally the command-line `overrides`.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<AnalyzerConfig, ConfigError> {
    let environment = config::Environment::with_prefix("ANALYZER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true);
    build_config(path, Some(environment), overrides)
}

fn build_config(
    path: Option<&Path>,
    environment: Option<config::Environment>,
    overrides: &Overrides,
) -> Result<AnalyzerConfig, ConfigError> {
    let defaults = AnalyzerConfig::default();

    let mut builder = config::Config::builder()
        .set_default("data_dir", defaults.data_dir.to_string_lossy().into_owned())?
        .set_default("output_dir", defaults.output_dir.to_string_lossy().into_owned())?
        .set_default("patterns.pnl", defaults.patterns.pnl)?
        .set_default("patterns.trade", defaults.patterns.trade)?
        .set_default("patterns.orderbook", defaults.patterns.orderbook)?
        .set_default("patterns.extension", defaults.patterns.extension)?
        .set_default("report.precision", defaults.report.precision as u64)?
        .set_default("report.generate_charts", defaults.report.generate_charts)?;

    builder = match path {
        Some(path) => builder.add_source(config::File::from(path).required(true)),
        None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
    };

    if let Some(environment) = environment {
        builder = builder.add_source(environment);
    }

    if let Some(dir) = &overrides.data_dir {
        builder = builder.set_override("data_dir", dir.to_string_lossy().into_owned())?;
    }
    if let Some(dir) = &overrides.output_dir {
        builder = builder.set_override("output_dir", dir.to_string_lossy().into_owned())?;
    }
    if overrides.no_charts {
        builder = builder.set_override("report.generate_charts", false)?;
    }

    // Attempt to deserialize the entire configuration into our `AnalyzerConfig` struct
    let config = builder.build()?.try_deserialize::<AnalyzerConfig>()?;
    config.validate()?;

    Ok(config)
}
