//! # Simulation Analytics
//!
//! Turns the raw tables produced by the `loader` crate into chronologically
//! ordered series and computes the performance and risk metrics of a run.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Normalization and metric computation are pure functions of
//!   their inputs. Running them twice on the same tables yields identical output.
//! - **Explicit Absence:** A metric family whose table is missing is `None` in
//!   the `MetricsReport`, never a zero placeholder.
//!
//! ## Public API
//!
//! - `normalize_pnl` / `normalize_trades`: Table normalization.
//! - `MetricsEngine`: The stateless metrics calculator.
//! - `MetricsReport`: The result, with one optional struct per metric family.
//! - `NormalizeError`: Raised for rows that fail validation.
//! - `MetricsError`: Raised when an aggregate overflows to a non-finite value.

pub mod engine;
pub mod error;
pub mod normalize;
pub mod report;
pub mod series;

pub use engine::MetricsEngine;
pub use error::{MetricsError, NormalizeError};
pub use normalize::{NormalizedPnl, NormalizedTrades, PnlRow, TradeRow, normalize_pnl, normalize_trades};
pub use report::{MetricName, MetricValue, MetricsReport, PnlMetrics, TradeMetrics};
