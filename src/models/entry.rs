//! Archive members and build results

use std::path::PathBuf;

/// A file scheduled for inclusion in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Absolute path of the file on disk.
    pub source_path: PathBuf,
    /// Member name inside the archive, `/`-separated and relative to the
    /// packaged directory.
    pub archive_path: String,
}

impl ArchiveEntry {
    pub fn new(source_path: impl Into<PathBuf>, archive_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            archive_path: archive_path.into(),
        }
    }
}

/// What ended up in a finished archive.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub output: PathBuf,
    /// Member names in the order they were written.
    pub entries: Vec<String>,
    pub readme_included: bool,
}

impl BuildSummary {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
