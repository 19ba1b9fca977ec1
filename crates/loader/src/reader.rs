use crate::error::LoadError;
use core_types::{RecordTable, SourceKind};
use serde::de::DeserializeOwned;
use std::path::Path;

pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Columns that must be present in the header row for each kind of source.
pub fn required_columns(kind: SourceKind) -> &'static [&'static str] {
    match kind {
        SourceKind::Pnl => &["TotalPnL"],
        SourceKind::Trade => &["Price", "Quantity", "Side"],
        SourceKind::OrderBook => &[],
    }
}

/// Reads a header-delimited CSV file into typed records.
///
/// Cells are trimmed before deserialization. A row that does not deserialize
/// (for example a non-numeric price) aborts the read with its 1-based data
/// row number.
pub fn read_table<R: DeserializeOwned>(path: &Path, kind: SourceKind) -> Result<RecordTable<R>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    for &column in required_columns(kind) {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                kind,
                path: path.to_path_buf(),
                column,
            });
        }
    }
    let has_timestamp = headers.iter().any(|h| h == TIMESTAMP_COLUMN);

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<R>().enumerate() {
        let record = row.map_err(|e| LoadError::MalformedRow {
            kind,
            row: index + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(RecordTable::new(path, has_timestamp, records))
}
