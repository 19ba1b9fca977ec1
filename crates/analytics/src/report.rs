use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics derived from the PnL table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnlMetrics {
    pub total_pnl: f64,
    pub max_pnl: f64,
    pub min_pnl: f64,
    /// Fractional, never positive.
    pub max_drawdown: f64,
    /// Annualized standard deviation of period-over-period returns.
    pub volatility: f64,
    pub sharpe_ratio: f64,
}

/// Metrics derived from the trade table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub total_trades: u64,
    pub buy_trades: u64,
    pub sell_trades: u64,
    pub total_volume: f64,
    pub avg_trade_size: f64,
    pub avg_trade_price: f64,
    pub price_range: f64,
}

/// The complete result of one metrics computation.
///
/// Each family is `None` when its source table was absent or empty; a family
/// that is present always carries every one of its values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub pnl: Option<PnlMetrics>,
    pub trades: Option<TradeMetrics>,
}

/// The fixed set of metric keys, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricName {
    TotalPnL,
    MaxPnL,
    MinPnL,
    MaxDrawdown,
    Volatility,
    SharpeRatio,
    TotalTrades,
    BuyTrades,
    SellTrades,
    TotalVolume,
    AvgTradeSize,
    AvgTradePrice,
    PriceRange,
}

impl MetricName {
    pub const PNL: [MetricName; 6] = [
        MetricName::TotalPnL,
        MetricName::MaxPnL,
        MetricName::MinPnL,
        MetricName::MaxDrawdown,
        MetricName::Volatility,
        MetricName::SharpeRatio,
    ];

    pub const TRADE: [MetricName; 7] = [
        MetricName::TotalTrades,
        MetricName::BuyTrades,
        MetricName::SellTrades,
        MetricName::TotalVolume,
        MetricName::AvgTradeSize,
        MetricName::AvgTradePrice,
        MetricName::PriceRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::TotalPnL => "TotalPnL",
            MetricName::MaxPnL => "MaxPnL",
            MetricName::MinPnL => "MinPnL",
            MetricName::MaxDrawdown => "MaxDrawdown",
            MetricName::Volatility => "Volatility",
            MetricName::SharpeRatio => "SharpeRatio",
            MetricName::TotalTrades => "TotalTrades",
            MetricName::BuyTrades => "BuyTrades",
            MetricName::SellTrades => "SellTrades",
            MetricName::TotalVolume => "TotalVolume",
            MetricName::AvgTradeSize => "AvgTradeSize",
            MetricName::AvgTradePrice => "AvgTradePrice",
            MetricName::PriceRange => "PriceRange",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single metric value: either a real number or a count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Float(f64),
    Count(u64),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            MetricValue::Float(v) => v,
            MetricValue::Count(n) => n as f64,
        }
    }
}

impl MetricsReport {
    pub fn is_empty(&self) -> bool {
        self.pnl.is_none() && self.trades.is_none()
    }

    /// Looks up one metric; `None` when its family was not computed.
    pub fn get(&self, name: MetricName) -> Option<MetricValue> {
        use MetricValue::{Count, Float};
        match name {
            MetricName::TotalPnL => self.pnl.map(|m| Float(m.total_pnl)),
            MetricName::MaxPnL => self.pnl.map(|m| Float(m.max_pnl)),
            MetricName::MinPnL => self.pnl.map(|m| Float(m.min_pnl)),
            MetricName::MaxDrawdown => self.pnl.map(|m| Float(m.max_drawdown)),
            MetricName::Volatility => self.pnl.map(|m| Float(m.volatility)),
            MetricName::SharpeRatio => self.pnl.map(|m| Float(m.sharpe_ratio)),
            MetricName::TotalTrades => self.trades.map(|m| Count(m.total_trades)),
            MetricName::BuyTrades => self.trades.map(|m| Count(m.buy_trades)),
            MetricName::SellTrades => self.trades.map(|m| Count(m.sell_trades)),
            MetricName::TotalVolume => self.trades.map(|m| Float(m.total_volume)),
            MetricName::AvgTradeSize => self.trades.map(|m| Float(m.avg_trade_size)),
            MetricName::AvgTradePrice => self.trades.map(|m| Float(m.avg_trade_price)),
            MetricName::PriceRange => self.trades.map(|m| Float(m.price_range)),
        }
    }

    /// Every present metric, PnL family first.
    pub fn entries(&self) -> Vec<(MetricName, MetricValue)> {
        MetricName::PNL
            .iter()
            .chain(MetricName::TRADE.iter())
            .filter_map(|&name| self.get(name).map(|value| (name, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_has_no_entries() {
        let report = MetricsReport::default();
        assert!(report.is_empty());
        assert!(report.entries().is_empty());
    }

    #[test]
    fn entries_follow_canonical_order() {
        let report = MetricsReport {
            pnl: None,
            trades: Some(TradeMetrics {
                total_trades: 2,
                buy_trades: 1,
                sell_trades: 1,
                total_volume: 8.0,
                avg_trade_size: 4.0,
                avg_trade_price: 10.25,
                price_range: 0.5,
            }),
        };
        let names: Vec<_> = report.entries().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, MetricName::TRADE.to_vec());
        assert_eq!(report.get(MetricName::TotalTrades), Some(MetricValue::Count(2)));
        assert_eq!(report.get(MetricName::TotalPnL), None);
    }

    #[test]
    fn absent_family_serializes_as_null() {
        let json = serde_json::to_value(MetricsReport::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "pnl": null, "trades": null }));
    }
}
