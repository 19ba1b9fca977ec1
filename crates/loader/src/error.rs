use core_types::SourceKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No input data found in {}. Please run the simulation first.", .dir.display())]
    NoInputData { dir: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("The {kind} source {} has no '{column}' column", .path.display())]
    MissingColumn {
        kind: SourceKind,
        path: PathBuf,
        column: &'static str,
    },

    #[error("Malformed {kind} row {row}: {reason}")]
    MalformedRow {
        kind: SourceKind,
        row: usize,
        reason: String,
    },
}
