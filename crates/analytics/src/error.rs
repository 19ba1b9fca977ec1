use crate::report::MetricName;
use core_types::SourceKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Malformed {table} row {row}: {reason}")]
    MalformedRow {
        table: SourceKind,
        row: usize,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("{metric} overflows for the given inputs")]
    NonFinite { metric: MetricName },
}
