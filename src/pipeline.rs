use analytics::{MetricsEngine, MetricsReport, NormalizedPnl, NormalizedTrades, normalize_pnl, normalize_trades};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use configuration::AnalyzerConfig;
use presentation::{ChartRenderer, ReportWriter};
use std::path::PathBuf;

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: MetricsReport,
    pub pnl: Option<NormalizedPnl>,
    pub trades: Option<NormalizedTrades>,
    pub charts: Vec<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// The load -> normalize -> compute -> present pipeline for one analysis run.
pub struct Pipeline {
    config: AnalyzerConfig,
    engine: MetricsEngine,
}

impl Pipeline {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            engine: MetricsEngine::new(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Runs every stage to completion.
    ///
    /// Missing sources only remove the metrics and charts that depend on them.
    /// The run fails when no source is found at all, when a row is malformed,
    /// when a metric overflows, or when an output cannot be written.
    pub fn run(&self, generated_at: NaiveDateTime) -> Result<RunOutcome> {
        let config = &self.config;
        loader::ensure_dir(&config.output_dir)?;

        // 1. Load
        let tables = loader::load_all(&config.data_dir, &config.patterns)?;

        // 2. Normalize
        tracing::info!("Preprocessing data...");
        let pnl = tables
            .pnl
            .as_ref()
            .map(normalize_pnl)
            .transpose()
            .context("PnL data failed validation")?;
        let trades = tables
            .trades
            .as_ref()
            .map(normalize_trades)
            .transpose()
            .context("Trade data failed validation")?;
        if let Some(order_book) = &tables.order_book {
            tracing::debug!(records = order_book.len(), "Order book data is not used by any metric.");
        }

        // 3. Compute
        tracing::info!("Calculating performance metrics...");
        let report = self
            .engine
            .calculate(pnl.as_ref(), trades.as_ref())
            .context("Performance metrics could not be calculated")?;

        // 4. Present
        let charts = if config.report.generate_charts {
            tracing::info!("Generating visualizations...");
            ChartRenderer::new(&config.output_dir)
                .render(pnl.as_ref(), trades.as_ref(), &report)
                .context("Failed to render charts")?
        } else {
            Vec::new()
        };

        let (report_path, json_path) = if report.is_empty() {
            tracing::info!("No performance metrics available for report generation.");
            (None, None)
        } else {
            let writer = ReportWriter::new(&config.output_dir, config.report.precision);
            let text = writer
                .write_text(&report, generated_at)
                .context("Failed to write analysis report")?;
            let json = writer
                .write_json(&report, generated_at)
                .context("Failed to write metrics JSON")?;
            tracing::info!(report = %text.display(), "Analysis report generated.");
            (Some(text), Some(json))
        };

        Ok(RunOutcome {
            report,
            pnl,
            trades,
            charts,
            report_path,
            json_path,
        })
    }
}
