//! # Record Loader
//!
//! Finds the simulation's CSV exports in a directory and reads them into typed
//! tables. Any subset of sources may be absent; only a directory with no
//! recognisable source at all is an error.

pub mod discovery;
pub mod error;
pub mod reader;

pub use discovery::{DiscoveredSources, discover_sources};
pub use error::LoadError;
pub use reader::read_table;

use configuration::SourcePatterns;
use core_types::{OrderBookRecord, PnlRecord, RecordTable, SourceKind, TradeRecord};
use std::fs;
use std::path::Path;

/// Every table a run managed to load. `None` means no source of that kind was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedTables {
    pub pnl: Option<RecordTable<PnlRecord>>,
    pub trades: Option<RecordTable<TradeRecord>>,
    pub order_book: Option<RecordTable<OrderBookRecord>>,
}

impl LoadedTables {
    pub fn is_empty(&self) -> bool {
        self.pnl.is_none() && self.trades.is_none() && self.order_book.is_none()
    }
}

/// Discovers and reads all sources in `dir`.
///
/// Returns [`LoadError::NoInputData`] when no source of any kind is present.
pub fn load_all(dir: &Path, patterns: &SourcePatterns) -> Result<LoadedTables, LoadError> {
    tracing::info!(dir = %dir.display(), "Loading simulation data...");
    let sources = discover_sources(dir, patterns)?;
    if sources.is_empty() {
        return Err(LoadError::NoInputData {
            dir: dir.to_path_buf(),
        });
    }

    let tables = LoadedTables {
        pnl: load_kind(&sources, SourceKind::Pnl)?,
        trades: load_kind(&sources, SourceKind::Trade)?,
        order_book: load_kind(&sources, SourceKind::OrderBook)?,
    };

    Ok(tables)
}

fn load_kind<R: serde::de::DeserializeOwned>(
    sources: &DiscoveredSources,
    kind: SourceKind,
) -> Result<Option<RecordTable<R>>, LoadError> {
    let Some(path) = sources.get(kind) else {
        return Ok(None);
    };
    let table = read_table::<R>(path, kind)?;
    tracing::info!(file = %path.display(), "Loaded {} data: {} records", kind, table.len());
    Ok(Some(table))
}

/// Creates `dir` (and its parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<(), LoadError> {
    fs::create_dir_all(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_is_no_input_data() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_all(dir.path(), &SourcePatterns::default()).unwrap_err();
        assert!(matches!(err, LoadError::NoInputData { .. }));
    }

    #[test]
    fn loads_only_present_kinds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("trade_data.csv"),
            "Timestamp,Price,Quantity,Side,TradeValue,TradeID\n2024-01-02 09:30:00,10.0,5,BUY,50,1\n",
        )
        .unwrap();

        let tables = load_all(dir.path(), &SourcePatterns::default()).unwrap();
        assert!(tables.pnl.is_none());
        assert!(tables.order_book.is_none());
        let trades = tables.trades.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades.records[0].trade_id.as_deref(), Some("1"));
    }

    #[test]
    fn header_only_order_book_counts_as_input() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("orderbook_data.csv"),
            "Timestamp,Side,Price,Quantity,OrderID,Status\n",
        )
        .unwrap();

        let tables = load_all(dir.path(), &SourcePatterns::default()).unwrap();
        assert!(!tables.is_empty());
        assert_eq!(tables.order_book.map(|t| t.len()), Some(0));
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
