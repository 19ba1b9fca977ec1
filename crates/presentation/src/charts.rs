use crate::error::PresentationError;
use crate::format::headline_figures;
use crate::report::write_file;
use crate::svg::{Canvas, Panel};
use analytics::series::{TradeBucket, bucket_trades};
use analytics::{MetricName, MetricsReport, NormalizedPnl, NormalizedTrades};
use chrono::Duration;
use std::path::PathBuf;

pub const PNL_CURVE_FILE: &str = "pnl_curve.svg";
pub const TRADE_ANALYSIS_FILE: &str = "trade_analysis.svg";
pub const DASHBOARD_FILE: &str = "performance_dashboard.svg";

const HISTOGRAM_BINS: usize = 30;
const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 640.0;

/// Renders the run's charts as SVG files in the output directory.
///
/// Every chart is optional: one whose inputs are missing is skipped with a log
/// line and the rest are still written.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    bucket_width: Duration,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            bucket_width: Duration::minutes(1),
        }
    }

    /// Writes every chart whose inputs are available and returns the written paths.
    pub fn render(
        &self,
        pnl: Option<&NormalizedPnl>,
        trades: Option<&NormalizedTrades>,
        report: &MetricsReport,
    ) -> Result<Vec<PathBuf>, PresentationError> {
        let pnl = pnl.filter(|t| !t.is_empty());
        let trades = trades.filter(|t| !t.is_empty());
        let buckets = trades
            .map(|t| bucket_trades(t, self.bucket_width))
            .unwrap_or_default();

        let mut written = Vec::new();

        match pnl {
            Some(table) => written.push(self.save(PNL_CURVE_FILE, pnl_curve(table))?),
            None => tracing::info!("No PnL data available for plotting."),
        }

        match trades {
            Some(table) => written.push(self.save(TRADE_ANALYSIS_FILE, trade_analysis(table, &buckets))?),
            None => tracing::info!("No trade data available for plotting."),
        }

        if report.is_empty() {
            tracing::info!("No performance metrics available for dashboard.");
        } else {
            written.push(self.save(DASHBOARD_FILE, dashboard(pnl, &buckets, report))?);
        }

        Ok(written)
    }

    fn save(&self, file_name: &str, svg: String) -> Result<PathBuf, PresentationError> {
        let path = self.output_dir.join(file_name);
        write_file(&path, &svg)?;
        tracing::info!(chart = %path.display(), "Chart written.");
        Ok(path)
    }
}

fn pnl_curve(table: &NormalizedPnl) -> String {
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let top = Panel::grid(canvas.width(), canvas.height(), 2, 1, 0, 0);
    let bottom = Panel::grid(canvas.width(), canvas.height(), 2, 1, 1, 0);

    canvas.line_series(&top, "PnL Over Time", &table.total_pnl(), "#1f77b4", true);
    canvas.line_series(&bottom, "Cumulative PnL", &table.cumulative_pnl(), "#2ca02c", false);
    canvas.finish()
}

fn trade_analysis(table: &NormalizedTrades, buckets: &[TradeBucket]) -> String {
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let cell = |row, col| Panel::grid(WIDTH, HEIGHT, 2, 2, row, col);

    let volume: Vec<f64> = buckets.iter().map(|b| b.volume).collect();
    canvas.bars(&cell(0, 0), "Trade Volume Over Time", &[], &volume, "#87ceeb");

    let prices: Vec<f64> = table.rows.iter().map(|r| r.price).collect();
    canvas.histogram(&cell(0, 1), "Trade Price Distribution", &prices, HISTOGRAM_BINS, "#f08080");

    let sizes: Vec<f64> = table.rows.iter().map(|r| r.quantity).collect();
    canvas.histogram(&cell(1, 0), "Trade Size Distribution", &sizes, HISTOGRAM_BINS, "#90ee90");

    let buys = table.rows.iter().filter(|r| r.signed_side > 0).count() as f64;
    let sells = table.rows.iter().filter(|r| r.signed_side < 0).count() as f64;
    let total = buys + sells;
    let labels = vec![
        format!("Buy {:.1}%", buys / total * 100.0),
        format!("Sell {:.1}%", sells / total * 100.0),
    ];
    canvas.bars(&cell(1, 1), "Buy vs Sell Ratio", &labels, &[buys, sells], "#add8e6");

    canvas.finish()
}

/// Risk metrics scaled by their largest value, as plotted on the dashboard.
///
/// Missing metrics count as zero; values are left unscaled when none is positive.
pub fn normalized_risk_values(report: &MetricsReport) -> [f64; 3] {
    let value = |name| report.get(name).map(|v| v.as_f64()).unwrap_or(0.0);
    let values = [
        value(MetricName::MaxDrawdown),
        value(MetricName::Volatility),
        value(MetricName::SharpeRatio),
    ];
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 { values.map(|v| v / max) } else { values }
}

fn dashboard(pnl: Option<&NormalizedPnl>, buckets: &[TradeBucket], report: &MetricsReport) -> String {
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let cell = |row, col| Panel::grid(WIDTH, HEIGHT, 2, 2, row, col);

    let lines: Vec<String> = headline_figures(report)
        .into_iter()
        .map(|(label, value)| format!("{:<14}{}", format!("{}:", label), value))
        .collect();
    canvas.text_block(&cell(0, 0), "Performance Metrics", &lines);

    if let Some(table) = pnl {
        canvas.histogram(&cell(0, 1), "PnL Distribution", &table.total_pnl(), HISTOGRAM_BINS, "#90ee90");
    }

    if !buckets.is_empty() {
        let counts: Vec<f64> = buckets.iter().map(|b| b.count as f64).collect();
        canvas.line_series(&cell(1, 0), "Trade Frequency Over Time", &counts, "#800080", false);
    }

    let labels: Vec<String> = ["MaxDrawdown", "Volatility", "SharpeRatio"]
        .iter()
        .zip(normalized_risk_values(report))
        .map(|(name, value)| format!("{} {:.3}", name, value))
        .collect();
    canvas.bars(
        &cell(1, 1),
        "Risk Metrics (Normalized)",
        &labels,
        &normalized_risk_values(report),
        "#ffa500",
    );

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{PnlMetrics, PnlRow, TradeRow};
    use chrono::NaiveDate;
    use core_types::Side;

    fn pnl_table() -> NormalizedPnl {
        NormalizedPnl {
            rows: vec![
                PnlRow {
                    timestamp: None,
                    total_pnl: 100.0,
                    daily_pnl: 100.0,
                    cumulative_pnl: 100.0,
                },
                PnlRow {
                    timestamp: None,
                    total_pnl: 150.0,
                    daily_pnl: 50.0,
                    cumulative_pnl: 250.0,
                },
            ],
            time_indexed: false,
        }
    }

    fn trade_table() -> NormalizedTrades {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 30, 0);
        NormalizedTrades {
            rows: vec![
                TradeRow {
                    timestamp: ts,
                    price: 10.0,
                    quantity: 5.0,
                    side: Side::Buy,
                    trade_value: 50.0,
                    signed_side: 1,
                },
                TradeRow {
                    timestamp: ts,
                    price: 10.5,
                    quantity: 3.0,
                    side: Side::Sell,
                    trade_value: 31.5,
                    signed_side: -1,
                },
            ],
            time_indexed: true,
        }
    }

    fn pnl_metrics() -> PnlMetrics {
        PnlMetrics {
            total_pnl: 150.0,
            max_pnl: 150.0,
            min_pnl: 100.0,
            max_drawdown: -0.2,
            volatility: 0.5,
            sharpe_ratio: 2.0,
        }
    }

    #[test]
    fn writes_only_trade_charts_without_pnl() {
        let dir = tempfile::tempdir().unwrap();
        let trades = trade_table();
        let report = analytics::MetricsEngine::new().calculate(None, Some(&trades)).unwrap();

        let written = ChartRenderer::new(dir.path())
            .render(None, Some(&trades), &report)
            .unwrap();

        assert_eq!(
            written,
            vec![dir.path().join(TRADE_ANALYSIS_FILE), dir.path().join(DASHBOARD_FILE)]
        );
        assert!(!dir.path().join(PNL_CURVE_FILE).exists());
        let dashboard = std::fs::read_to_string(dir.path().join(DASHBOARD_FILE)).unwrap();
        assert!(dashboard.contains("Total PnL:"));
        assert!(dashboard.contains("n/a"));
    }

    #[test]
    fn writes_all_charts_with_full_input() {
        let dir = tempfile::tempdir().unwrap();
        let report = MetricsReport {
            pnl: Some(pnl_metrics()),
            trades: None,
        };
        let written = ChartRenderer::new(dir.path())
            .render(Some(&pnl_table()), Some(&trade_table()), &report)
            .unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn nothing_is_written_without_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let written = ChartRenderer::new(dir.path())
            .render(None, None, &MetricsReport::default())
            .unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn risk_values_are_scaled_by_largest() {
        let report = MetricsReport {
            pnl: Some(pnl_metrics()),
            trades: None,
        };
        assert_eq!(normalized_risk_values(&report), [-0.1, 0.25, 1.0]);
        assert_eq!(normalized_risk_values(&MetricsReport::default()), [0.0, 0.0, 0.0]);
    }
}
