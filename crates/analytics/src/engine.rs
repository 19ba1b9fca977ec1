use crate::error::MetricsError;
use crate::normalize::{NormalizedPnl, NormalizedTrades};
use crate::report::{MetricName, MetricsReport, PnlMetrics, TradeMetrics};
use crate::series::{drawdown_series, mean, pct_changes, sample_std};

/// Trading days per year, used to annualize volatility and returns.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A stateless calculator for deriving performance metrics from normalized tables.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `pnl` - The normalized PnL table, if one was loaded.
    /// * `trades` - The normalized trade table, if one was loaded.
    ///
    /// # Returns
    ///
    /// A `MetricsReport` in which each family is present only when its table
    /// was supplied and non-empty, or `MetricsError::NonFinite` when a trade
    /// aggregate overflows.
    pub fn calculate(
        &self,
        pnl: Option<&NormalizedPnl>,
        trades: Option<&NormalizedTrades>,
    ) -> Result<MetricsReport, MetricsError> {
        let report = MetricsReport {
            pnl: pnl.and_then(|table| self.calculate_pnl(table)),
            trades: match trades {
                Some(table) => self.calculate_trades(table)?,
                None => None,
            },
        };

        if let Some(m) = &report.pnl {
            tracing::debug!(
                total_pnl = m.total_pnl,
                max_drawdown = m.max_drawdown,
                volatility = m.volatility,
                sharpe_ratio = m.sharpe_ratio,
                "PnL metrics calculated."
            );
        }
        if let Some(m) = &report.trades {
            tracing::debug!(total_trades = m.total_trades, total_volume = m.total_volume, "Trade metrics calculated.");
        }

        Ok(report)
    }

    /// Calculates profitability, drawdown and risk metrics.
    fn calculate_pnl(&self, table: &NormalizedPnl) -> Option<PnlMetrics> {
        let last = table.rows.last()?;

        let (max_pnl, min_pnl) = table
            .rows
            .iter()
            .fold((f64::NEG_INFINITY, f64::INFINITY), |(max, min), row| {
                (max.max(row.total_pnl), min.min(row.total_pnl))
            });

        let max_drawdown = drawdown_series(&table.cumulative_pnl())
            .into_iter()
            .fold(0.0_f64, f64::min);

        let (volatility, sharpe_ratio) = self.calculate_risk(&table.total_pnl());

        Some(PnlMetrics {
            total_pnl: last.total_pnl,
            max_pnl,
            min_pnl,
            max_drawdown,
            volatility,
            sharpe_ratio,
        })
    }

    /// Annualized volatility and Sharpe ratio of period-over-period returns.
    ///
    /// Both are `0.0` when fewer than two returns are defined; the Sharpe ratio
    /// is also `0.0` when volatility is zero. Risk-free rate is assumed zero.
    fn calculate_risk(&self, total_pnl: &[f64]) -> (f64, f64) {
        let returns = pct_changes(total_pnl);

        let volatility = match sample_std(&returns) {
            Some(std) if std.is_finite() => std * TRADING_DAYS_PER_YEAR.sqrt(),
            _ => 0.0,
        };

        let sharpe_ratio = match mean(&returns) {
            Some(mean_return) if volatility > 0.0 => {
                let sharpe = (mean_return * TRADING_DAYS_PER_YEAR) / volatility;
                if sharpe.is_finite() { sharpe } else { 0.0 }
            }
            _ => 0.0,
        };

        (volatility, sharpe_ratio)
    }

    /// Calculates trade counts, volume and price statistics.
    ///
    /// Every input is finite after normalization, but sums and the price range
    /// can still overflow. Such a table is rejected rather than reported.
    fn calculate_trades(&self, table: &NormalizedTrades) -> Result<Option<TradeMetrics>, MetricsError> {
        if table.is_empty() {
            return Ok(None);
        }

        let total_trades = table.rows.len() as u64;
        let buy_trades = table.rows.iter().filter(|r| r.signed_side > 0).count() as u64;
        let sell_trades = table.rows.iter().filter(|r| r.signed_side < 0).count() as u64;

        let total_volume: f64 = table.rows.iter().map(|r| r.quantity).sum();
        let price_sum: f64 = table.rows.iter().map(|r| r.price).sum();
        let (max_price, min_price) = table
            .rows
            .iter()
            .fold((f64::NEG_INFINITY, f64::INFINITY), |(max, min), row| {
                (max.max(row.price), min.min(row.price))
            });

        let total_volume = finite(MetricName::TotalVolume, total_volume)?;
        Ok(Some(TradeMetrics {
            total_trades,
            buy_trades,
            sell_trades,
            total_volume,
            avg_trade_size: finite(MetricName::AvgTradeSize, total_volume / total_trades as f64)?,
            avg_trade_price: finite(MetricName::AvgTradePrice, price_sum / total_trades as f64)?,
            price_range: finite(MetricName::PriceRange, max_price - min_price)?,
        }))
    }
}

fn finite(metric: MetricName, value: f64) -> Result<f64, MetricsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MetricsError::NonFinite { metric })
    }
}
