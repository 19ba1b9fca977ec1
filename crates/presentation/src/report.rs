use crate::error::PresentationError;
use crate::format::format_value;
use analytics::MetricsReport;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

const BANNER_WIDTH: usize = 60;
const SECTION_WIDTH: usize = 30;

/// Writes the metrics of a run as a plain-text report and a JSON document.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    precision: usize,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, precision: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            precision,
        }
    }

    /// Renders the text report. Only metrics present in `report` are listed.
    pub fn render(&self, report: &MetricsReport, generated_at: NaiveDateTime) -> String {
        let banner = "=".repeat(BANNER_WIDTH);
        let mut out = String::new();

        out.push_str(&format!("{banner}\nHIGH-FREQUENCY TRADING MARKET MAKER ANALYSIS REPORT\n{banner}\n\n"));
        out.push_str(&format!("Generated: {}\n\n", generated_at.format("%Y-%m-%d %H:%M:%S")));

        out.push_str("PERFORMANCE METRICS\n");
        out.push_str(&format!("{}\n", "-".repeat(SECTION_WIDTH)));
        for (name, value) in report.entries() {
            out.push_str(&format!("{}: {}\n", name, format_value(value, self.precision)));
        }

        out.push_str(&format!("\n{banner}\nEND OF REPORT\n{banner}\n"));
        out
    }

    /// Writes `analysis_report_<YYYYmmdd_HHMMSS>.txt` and returns its path.
    pub fn write_text(&self, report: &MetricsReport, generated_at: NaiveDateTime) -> Result<PathBuf, PresentationError> {
        let path = self
            .output_dir
            .join(format!("analysis_report_{}.txt", generated_at.format("%Y%m%d_%H%M%S")));
        write_file(&path, &self.render(report, generated_at))?;
        Ok(path)
    }

    /// Writes `metrics_<YYYYmmdd_HHMMSS>.json` and returns its path.
    pub fn write_json(&self, report: &MetricsReport, generated_at: NaiveDateTime) -> Result<PathBuf, PresentationError> {
        let path = self
            .output_dir
            .join(format!("metrics_{}.json", generated_at.format("%Y%m%d_%H%M%S")));
        let body = serde_json::to_string_pretty(report)?;
        write_file(&path, &body)?;
        Ok(path)
    }
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), PresentationError> {
    fs::write(path, contents).map_err(|source| PresentationError::Io {
        path: path.to_path_buf(),
        source,
    })
}
