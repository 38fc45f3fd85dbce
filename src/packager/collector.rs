//! Discovery of the files that go into an archive

use crate::models::ArchiveEntry;
use crate::utils::helpers::{to_archive_path, README_NAME};
use std::path::Path;
use walkdir::WalkDir;

/// Collect every regular file under `source_dir`, ordered by member name.
///
/// Symlinked directories are not descended into; symlinks to regular files
/// are kept. A `README.md` at the root of `source_dir` is left out, and so is
/// `exclude` (the archive being written, when it lives inside the tree).
/// Entries that cannot be read while walking are skipped with a warning.
///
/// `source_dir` must be absolute and canonical so that `exclude` compares
/// against the same form.
pub fn collect_entries(source_dir: &Path, exclude: Option<&Path>) -> Vec<ArchiveEntry> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(source_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() || exclude == Some(path) {
            continue;
        }

        let Ok(relative) = path.strip_prefix(source_dir) else {
            continue;
        };

        let archive_path = to_archive_path(relative);
        if archive_path == README_NAME {
            log::debug!("Leaving out {} in favour of the project README", path.display());
            continue;
        }

        entries.push(ArchiveEntry::new(path, archive_path));
    }

    entries.sort_by(|a, b| a.archive_path.cmp(&b.archive_path));
    entries
}
