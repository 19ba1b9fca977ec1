use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresentationError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize metrics: {0}")]
    Serialization(#[from] serde_json::Error),
}
