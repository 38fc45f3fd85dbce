//! Errors surfaced to callers of the packager

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Exit status for a version that could not be determined.
pub const EXIT_VERSION_UNRESOLVED: i32 = 2;

/// Exit status for every other failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Source directory does not exist: {}", .0.display())]
    MissingSource(PathBuf),

    #[error(
        "Could not determine version. Provide --version or ensure {} contains <em:version>.",
        .0.display()
    )]
    VersionUnresolved(PathBuf),

    #[error("{} failed for {}: {source}", .action, .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl PackageError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        PackageError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Process exit status a CLI should report for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PackageError::VersionUnresolved(_) => EXIT_VERSION_UNRESOLVED,
            _ => EXIT_FAILURE,
        }
    }
}
