//! Structural validation of packaging inputs

use crate::models::PackageError;
use std::path::{Path, PathBuf};

/// Resolve `source_dir` to an absolute path and make sure it is a directory.
pub fn validate_source_dir(source_dir: &Path) -> Result<PathBuf, PackageError> {
    let resolved = source_dir
        .canonicalize()
        .map_err(|_| PackageError::MissingSource(absolute(source_dir)))?;

    if !resolved.is_dir() {
        return Err(PackageError::MissingSource(resolved));
    }

    Ok(resolved)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let resolved = validate_source_dir(temp_dir.path()).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = validate_source_dir(&temp_dir.path().join("src")).unwrap_err();
        match err {
            PackageError::MissingSource(path) => assert!(path.ends_with("src")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_is_not_a_source_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("install.rdf");
        fs::write(&file, "<RDF/>").unwrap();
        assert!(matches!(
            validate_source_dir(&file),
            Err(PackageError::MissingSource(_))
        ));
    }
}
