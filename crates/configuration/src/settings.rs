use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for an analysis run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyzerConfig {
    /// Directory holding the simulation's CSV exports.
    pub data_dir: PathBuf,
    /// Directory receiving charts, the text report and the log file.
    pub output_dir: PathBuf,
    #[serde(default)]
    pub patterns: SourcePatterns,
    #[serde(default)]
    pub report: ReportSettings,
}

/// Filename substrings used to recognise each kind of source file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourcePatterns {
    pub pnl: String,
    pub trade: String,
    pub orderbook: String,
    /// Required file extension, without the dot.
    pub extension: String,
}

/// Contains parameters for the presentation stage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportSettings {
    /// Number of decimals used for floating-point metrics in the text report.
    pub precision: usize,
    /// When false, only the text and JSON reports are produced.
    pub generate_charts: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("data"),
            patterns: SourcePatterns::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Default for SourcePatterns {
    fn default() -> Self {
        Self {
            pnl: "pnl".to_string(),
            trade: "trade".to_string(),
            orderbook: "orderbook".to_string(),
            extension: "csv".to_string(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            precision: 4,
            generate_charts: true,
        }
    }
}

impl AnalyzerConfig {
    /// Rejects settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("data_dir must not be empty".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("output_dir must not be empty".into()));
        }
        let patterns = [
            ("patterns.pnl", &self.patterns.pnl),
            ("patterns.trade", &self.patterns.trade),
            ("patterns.orderbook", &self.patterns.orderbook),
        ];
        for (key, value) in patterns {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{} must not be empty", key)));
            }
        }
        if self.report.precision > 12 {
            return Err(ConfigError::ValidationError(format!(
                "report.precision must be at most 12, got {}",
                self.report.precision
            )));
        }
        Ok(())
    }
}

/// Values supplied on the command line. They take precedence over every other source.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// Directory containing simulation data.
    #[cfg_attr(feature = "clap", arg(long))]
    pub data_dir: Option<PathBuf>,

    /// Output directory for analysis results.
    #[cfg_attr(feature = "clap", arg(long))]
    pub output_dir: Option<PathBuf>,

    /// Skip chart rendering.
    #[cfg_attr(feature = "clap", arg(long))]
    pub no_charts: bool,
}
