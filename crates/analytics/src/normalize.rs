use crate::error::NormalizeError;
use chrono::{DateTime, NaiveDateTime};
use core_types::{PnlRecord, RecordTable, Side, SourceKind, TradeRecord};
use serde::Serialize;

/// Timestamp layouts accepted in addition to RFC 3339.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A PnL snapshot after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlRow {
    pub timestamp: Option<NaiveDateTime>,
    pub total_pnl: f64,
    pub daily_pnl: f64,
    /// Running sum of `total_pnl` up to and including this row.
    pub cumulative_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPnl {
    pub rows: Vec<PnlRow>,
    /// False when the source had no `Timestamp` column; rows are then in file order.
    pub time_indexed: bool,
}

/// A trade execution after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRow {
    pub timestamp: Option<NaiveDateTime>,
    pub price: f64,
    pub quantity: f64,
    pub side: Side,
    pub trade_value: f64,
    pub signed_side: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTrades {
    pub rows: Vec<TradeRow>,
    pub time_indexed: bool,
}

impl NormalizedPnl {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_pnl(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.total_pnl).collect()
    }

    pub fn cumulative_pnl(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.cumulative_pnl).collect()
    }
}

impl NormalizedTrades {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses a timestamp cell into the canonical naive (wall-clock) form.
///
/// RFC 3339 values carrying an offset are converted to UTC first.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

fn malformed(table: SourceKind, index: usize, reason: impl Into<String>) -> NormalizeError {
    NormalizeError::MalformedRow {
        table,
        row: index + 1,
        reason: reason.into(),
    }
}

fn row_timestamp(
    table: SourceKind,
    index: usize,
    raw: Option<&str>,
    time_indexed: bool,
) -> Result<Option<NaiveDateTime>, NormalizeError> {
    if !time_indexed {
        return Ok(None);
    }
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| malformed(table, index, format!("unparseable Timestamp '{}'", value))),
        None => Err(malformed(table, index, "missing Timestamp")),
    }
}

fn finite(table: SourceKind, index: usize, column: &str, value: f64) -> Result<f64, NormalizeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(malformed(table, index, format!("non-finite {} value {}", column, value)))
    }
}

/// Orders the PnL snapshots chronologically and derives the cumulative column.
///
/// Missing `DailyPnL` cells become `0.0`. A missing `TotalPnL` cell or a bad
/// timestamp aborts normalization of the whole table.
pub fn normalize_pnl(table: &RecordTable<PnlRecord>) -> Result<NormalizedPnl, NormalizeError> {
    let kind = SourceKind::Pnl;
    let time_indexed = table.has_timestamp;

    let mut rows = Vec::with_capacity(table.len());
    for (index, record) in table.records.iter().enumerate() {
        let timestamp = row_timestamp(kind, index, record.timestamp.as_deref(), time_indexed)?;
        let total_pnl = record
            .total_pnl
            .ok_or_else(|| malformed(kind, index, "missing TotalPnL"))?;
        let total_pnl = finite(kind, index, "TotalPnL", total_pnl)?;
        let daily_pnl = finite(kind, index, "DailyPnL", record.daily_pnl.unwrap_or(0.0))?;

        rows.push(PnlRow {
            timestamp,
            total_pnl,
            daily_pnl,
            cumulative_pnl: 0.0,
        });
    }

    if time_indexed {
        // Stable: rows sharing a timestamp keep their file order.
        rows.sort_by_key(|row| row.timestamp);
    }

    let mut running = 0.0;
    for row in &mut rows {
        running += row.total_pnl;
        row.cumulative_pnl = running;
    }

    Ok(NormalizedPnl { rows, time_indexed })
}

/// Orders the trades chronologically and derives notional value and signed side.
///
/// A `Side` label other than `BUY` / `SELL` aborts normalization of the table.
pub fn normalize_trades(table: &RecordTable<TradeRecord>) -> Result<NormalizedTrades, NormalizeError> {
    let kind = SourceKind::Trade;
    let time_indexed = table.has_timestamp;

    let mut rows = Vec::with_capacity(table.len());
    for (index, record) in table.records.iter().enumerate() {
        let timestamp = row_timestamp(kind, index, record.timestamp.as_deref(), time_indexed)?;
        let price = finite(kind, index, "Price", record.price)?;
        let quantity = finite(kind, index, "Quantity", record.quantity)?;
        let side: Side = record
            .side
            .parse()
            .map_err(|e: core_types::CoreError| malformed(kind, index, e.to_string()))?;

        rows.push(TradeRow {
            timestamp,
            price,
            quantity,
            side,
            trade_value: price * quantity,
            signed_side: side.signum(),
        });
    }

    if time_indexed {
        rows.sort_by_key(|row| row.timestamp);
    }

    Ok(NormalizedTrades { rows, time_indexed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pnl(timestamp: Option<&str>, total: Option<f64>, daily: Option<f64>) -> PnlRecord {
        PnlRecord {
            timestamp: timestamp.map(String::from),
            total_pnl: total,
            daily_pnl: daily,
            realized_pnl: None,
            unrealized_pnl: None,
            position: None,
            mark_price: None,
        }
    }

    fn trade(timestamp: &str, price: f64, quantity: f64, side: &str) -> TradeRecord {
        TradeRecord {
            timestamp: Some(timestamp.to_string()),
            price,
            quantity,
            side: side.to_string(),
            trade_id: None,
        }
    }

    #[test]
    fn parses_supported_timestamp_layouts() {
        assert!(parse_timestamp("2024-01-02 09:30:00").is_some());
        assert!(parse_timestamp("2024-01-02 09:30:00.125").is_some());
        assert!(parse_timestamp("2024-01-02T09:30:00").is_some());
        assert_eq!(
            parse_timestamp("2024-01-02T10:30:00+01:00"),
            parse_timestamp("2024-01-02 09:30:00")
        );
        assert!(parse_timestamp("02/01/2024").is_none());
    }

    #[test]
    fn cumulative_is_running_sum_in_time_order() {
        let table = RecordTable::new(
            "pnl.csv",
            true,
            vec![
                pnl(Some("2024-01-02 09:32:00"), Some(90.0), Some(-60.0)),
                pnl(Some("2024-01-02 09:30:00"), Some(100.0), Some(100.0)),
                pnl(Some("2024-01-02 09:31:00"), Some(150.0), None),
            ],
        );

        let normalized = normalize_pnl(&table).unwrap();
        assert!(normalized.time_indexed);
        assert_eq!(normalized.total_pnl(), vec![100.0, 150.0, 90.0]);
        assert_eq!(normalized.cumulative_pnl(), vec![100.0, 250.0, 340.0]);
        assert_eq!(normalized.rows[1].daily_pnl, 0.0);

        for (i, row) in normalized.rows.iter().enumerate() {
            let resummed: f64 = normalized.rows[..=i].iter().map(|r| r.total_pnl).sum();
            assert_eq!(row.cumulative_pnl, resummed);
        }
    }

    #[test]
    fn duplicate_timestamps_are_retained_in_file_order() {
        let table = RecordTable::new(
            "pnl.csv",
            true,
            vec![
                pnl(Some("2024-01-02 09:30:00"), Some(1.0), None),
                pnl(Some("2024-01-02 09:30:00"), Some(2.0), None),
            ],
        );
        let normalized = normalize_pnl(&table).unwrap();
        assert_eq!(normalized.total_pnl(), vec![1.0, 2.0]);
    }

    #[test]
    fn without_timestamp_column_keeps_ingestion_order() {
        let table = RecordTable::new(
            "pnl.csv",
            false,
            vec![pnl(None, Some(5.0), None), pnl(None, Some(-3.0), None)],
        );
        let normalized = normalize_pnl(&table).unwrap();
        assert!(!normalized.time_indexed);
        assert!(normalized.rows.iter().all(|r| r.timestamp.is_none()));
        assert_eq!(normalized.cumulative_pnl(), vec![5.0, 2.0]);
    }

    #[test]
    fn missing_total_pnl_is_malformed() {
        let table = RecordTable::new(
            "pnl.csv",
            false,
            vec![pnl(None, Some(5.0), None), pnl(None, None, Some(1.0))],
        );
        let err = normalize_pnl(&table).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::MalformedRow {
                table: SourceKind::Pnl,
                row: 2,
                reason: "missing TotalPnL".to_string(),
            }
        );
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let table = RecordTable::new("pnl.csv", true, vec![pnl(Some("yesterday"), Some(1.0), None)]);
        assert!(matches!(
            normalize_pnl(&table),
            Err(NormalizeError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn derives_trade_value_and_signed_side() {
        let table = RecordTable::new(
            "trades.csv",
            true,
            vec![
                trade("2024-01-02 09:30:10", 10.5, 3.0, "SELL"),
                trade("2024-01-02 09:30:00", 10.0, 5.0, "BUY"),
            ],
        );
        let normalized = normalize_trades(&table).unwrap();
        assert_eq!(normalized.rows[0].side, Side::Buy);
        assert_eq!(normalized.rows[0].signed_side, 1);
        assert_eq!(normalized.rows[0].trade_value, 50.0);
        assert_eq!(normalized.rows[1].signed_side, -1);
        assert_eq!(normalized.rows[1].trade_value, 31.5);
    }

    #[test]
    fn unknown_side_aborts_with_row_number() {
        let table = RecordTable::new(
            "trades.csv",
            true,
            vec![
                trade("2024-01-02 09:30:00", 10.0, 5.0, "BUY"),
                trade("2024-01-02 09:30:01", 10.0, 5.0, "SHORT"),
            ],
        );
        match normalize_trades(&table).unwrap_err() {
            NormalizeError::MalformedRow { table, row, reason } => {
                assert_eq!(table, SourceKind::Trade);
                assert_eq!(row, 2);
                assert!(reason.contains("SHORT"));
            }
        }
    }

    #[test]
    fn normalization_is_deterministic() {
        let table = RecordTable::new(
            "trades.csv",
            true,
            vec![
                trade("2024-01-02 09:30:00", 10.0, 5.0, "BUY"),
                trade("2024-01-02 09:30:00", 10.1, 2.0, "SELL"),
            ],
        );
        assert_eq!(normalize_trades(&table).unwrap(), normalize_trades(&table).unwrap());
    }
}
