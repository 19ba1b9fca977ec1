use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of the simulator's PnL export, as read from disk.
///
/// Only `TotalPnL` feeds the metrics; the remaining columns are optional and
/// carried along for completeness. Timestamps stay as raw strings here and are
/// parsed during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlRecord {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "TotalPnL", default)]
    pub total_pnl: Option<f64>,
    #[serde(rename = "DailyPnL", default)]
    pub daily_pnl: Option<f64>,
    #[serde(rename = "RealizedPnL", default)]
    pub realized_pnl: Option<f64>,
    #[serde(rename = "UnrealizedPnL", default)]
    pub unrealized_pnl: Option<f64>,
    #[serde(rename = "Position", default)]
    pub position: Option<f64>,
    #[serde(rename = "MarkPrice", default)]
    pub mark_price: Option<f64>,
}

/// One trade execution, as read from disk.
///
/// `side` is kept as the raw label so that an unrecognised value can be
/// reported with its row number instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Side")]
    pub side: String,
    #[serde(rename = "TradeID", default)]
    pub trade_id: Option<String>,
}

/// One order-book event. Every column is optional; the table is only counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookRecord {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "Side", default)]
    pub side: Option<String>,
    #[serde(rename = "Price", default)]
    pub price: Option<f64>,
    #[serde(rename = "Quantity", default)]
    pub quantity: Option<f64>,
    #[serde(rename = "OrderID", default)]
    pub order_id: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

/// A loaded table together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable<R> {
    pub source: PathBuf,
    /// Whether the header row carried a `Timestamp` column.
    pub has_timestamp: bool,
    pub records: Vec<R>,
}

impl<R> RecordTable<R> {
    pub fn new(source: impl Into<PathBuf>, has_timestamp: bool, records: Vec<R>) -> Self {
        Self {
            source: source.into(),
            has_timestamp,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
