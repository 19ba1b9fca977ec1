use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The direction of a trade execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns `+1` for a buy and `-1` for a sell.
    pub fn signum(&self) -> i8 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl FromStr for Side {
    type Err = CoreError;

    /// Parses the simulator's `BUY` / `SELL` labels. Matching is exact after
    /// trimming surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(CoreError::InvalidInput(
                "Side".to_string(),
                format!("expected BUY or SELL, got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kinds of tabular sources a simulation run can leave behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Pnl,
    Trade,
    OrderBook,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Pnl, SourceKind::Trade, SourceKind::OrderBook];

    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Pnl => "PnL",
            SourceKind::Trade => "trade",
            SourceKind::OrderBook => "order book",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
