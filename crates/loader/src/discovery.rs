use crate::error::LoadError;
use configuration::SourcePatterns;
use core_types::SourceKind;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The file selected for each kind of source, if any matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredSources {
    pub pnl: Option<PathBuf>,
    pub trade: Option<PathBuf>,
    pub order_book: Option<PathBuf>,
}

impl DiscoveredSources {
    pub fn get(&self, kind: SourceKind) -> Option<&Path> {
        match kind {
            SourceKind::Pnl => self.pnl.as_deref(),
            SourceKind::Trade => self.trade.as_deref(),
            SourceKind::OrderBook => self.order_book.as_deref(),
        }
    }

    fn slot(&mut self, kind: SourceKind) -> &mut Option<PathBuf> {
        match kind {
            SourceKind::Pnl => &mut self.pnl,
            SourceKind::Trade => &mut self.trade,
            SourceKind::OrderBook => &mut self.order_book,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pnl.is_none() && self.trade.is_none() && self.order_book.is_none()
    }
}

/// Returns the filename substring configured for `kind`.
pub fn pattern_for<'a>(patterns: &'a SourcePatterns, kind: SourceKind) -> &'a str {
    match kind {
        SourceKind::Pnl => &patterns.pnl,
        SourceKind::Trade => &patterns.trade,
        SourceKind::OrderBook => &patterns.orderbook,
    }
}

/// Locates at most one file per source kind in `dir`.
///
/// A file matches when its name contains the kind's pattern and carries the
/// configured extension. Candidates are sorted by file name and the first one
/// wins, so the choice does not depend on directory listing order. A missing
/// directory yields no sources at all.
pub fn discover_sources(dir: &Path, patterns: &SourcePatterns) -> Result<DiscoveredSources, LoadError> {
    let mut file_names = match list_file_names(dir) {
        Ok(names) => names,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(dir = %dir.display(), "Data directory does not exist.");
            return Ok(DiscoveredSources::default());
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };
    file_names.sort();

    let suffix = format!(".{}", patterns.extension.trim_start_matches('.'));
    let mut discovered = DiscoveredSources::default();

    for kind in SourceKind::ALL {
        let pattern = pattern_for(patterns, kind);
        let mut matches = file_names
            .iter()
            .filter(|name| name.contains(pattern) && name.ends_with(&suffix));

        match matches.next() {
            Some(first) => {
                for ignored in matches {
                    tracing::warn!(kind = %kind, file = %ignored, selected = %first, "Ignoring additional matching source.");
                }
                *discovered.slot(kind) = Some(dir.join(first));
            }
            None => tracing::info!("No {} data found", kind),
        }
    }

    Ok(discovered)
}

fn list_file_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        // Non-UTF-8 names cannot match a textual pattern.
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "Timestamp\n").unwrap();
    }

    #[test]
    fn picks_lexicographically_first_match() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "run2_pnl.csv");
        touch(dir.path(), "run1_pnl.csv");
        touch(dir.path(), "trade_data.csv");

        let sources = discover_sources(dir.path(), &SourcePatterns::default()).unwrap();
        assert_eq!(sources.pnl, Some(dir.path().join("run1_pnl.csv")));
        assert_eq!(sources.trade, Some(dir.path().join("trade_data.csv")));
        assert_eq!(sources.order_book, None);
    }

    #[test]
    fn requires_the_configured_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "pnl_data.txt");
        touch(dir.path(), "orderbook_data.csv");

        let sources = discover_sources(dir.path(), &SourcePatterns::default()).unwrap();
        assert_eq!(sources.pnl, None);
        assert!(sources.get(SourceKind::OrderBook).is_some());
    }

    #[test]
    fn skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("old_pnl.csv")).unwrap();

        let sources = discover_sources(dir.path(), &SourcePatterns::default()).unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn missing_directory_has_no_sources() {
        let dir = tempfile::tempdir().unwrap();
        let sources = discover_sources(&dir.path().join("absent"), &SourcePatterns::default()).unwrap();
        assert!(sources.is_empty());
    }
}
