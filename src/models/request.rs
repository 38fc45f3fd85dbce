//! Packaging request and version resolution

use super::PackageError;
use crate::parser::install_rdf::{lookup_version, NotFoundReason, VersionLookup};
use crate::utils::helpers::{project_readme_path, xpi_file_name};
use std::path::{Path, PathBuf};

/// Default directory that holds the extension sources.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Metadata file looked up inside the source directory when none is given.
pub const INSTALL_RDF: &str = "install.rdf";

/// Where the root-level README of the archive comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReadmeSource {
    /// `README.md` one directory above the running executable.
    #[default]
    ProjectRoot,
    /// An explicit file.
    Path(PathBuf),
    /// Do not inject a README.
    Skip,
}

impl ReadmeSource {
    pub fn locate(&self) -> Option<PathBuf> {
        match self {
            ReadmeSource::ProjectRoot => project_readme_path(),
            ReadmeSource::Path(path) => Some(path.clone()),
            ReadmeSource::Skip => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrigin {
    Override,
    Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub value: String,
    pub origin: VersionOrigin,
}

/// Inputs for a single packaging run.
#[derive(Debug, Clone)]
pub struct PackageRequest {
    pub source_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub output_dir: PathBuf,
    pub version_override: Option<String>,
    pub readme: ReadmeSource,
}

impl Default for PackageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_DIR)
    }
}

impl PackageRequest {
    /// Request for `source_dir` with `<source_dir>/install.rdf` as metadata
    /// and the current directory as output.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let metadata_path = source_dir.join(INSTALL_RDF);

        Self {
            source_dir,
            metadata_path,
            output_dir: PathBuf::from("."),
            version_override: None,
            readme: ReadmeSource::default(),
        }
    }

    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version_override = Some(version.into());
        self
    }

    pub fn with_readme(mut self, readme: ReadmeSource) -> Self {
        self.readme = readme;
        self
    }

    /// Explicit override first, then the metadata file.
    ///
    /// A blank override is treated as not given.
    pub fn resolve_version(&self) -> Result<ResolvedVersion, PackageError> {
        if let Some(version) = self
            .version_override
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return Ok(ResolvedVersion {
                value: version.to_string(),
                origin: VersionOrigin::Override,
            });
        }

        match lookup_version(&self.metadata_path) {
            VersionLookup::Found(value) => Ok(ResolvedVersion {
                value,
                origin: VersionOrigin::Metadata,
            }),
            VersionLookup::NotFound(reason) => {
                log_missing_version(&self.metadata_path, &reason);
                Err(PackageError::VersionUnresolved(self.metadata_path.clone()))
            }
        }
    }

    /// Path of the archive for `version` inside the output directory.
    pub fn output_file(&self, version: &str) -> PathBuf {
        self.output_dir.join(xpi_file_name(version))
    }
}

fn log_missing_version(path: &Path, reason: &NotFoundReason) {
    match reason {
        NotFoundReason::MissingFile => {
            log::debug!("{} does not exist", path.display());
        }
        NotFoundReason::NoVersionElement => {
            log::debug!("{} has no usable version element", path.display());
        }
        NotFoundReason::Unreadable(err) | NotFoundReason::Malformed(err) => {
            log::warn!("Ignoring {}: {}", path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const INSTALL_RDF_BODY: &str = r#"<?xml version="1.0"?>
<RDF xmlns="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:em="http://www.mozilla.org/2004/em-rdf#">
  <Description about="urn:mozilla:install-manifest">
    <em:id>abdm@example.org</em:id>
    <em:version>1.4.0</em:version>
  </Description>
</RDF>"#;

    #[test]
    fn test_defaults() {
        let request = PackageRequest::default();
        assert_eq!(request.source_dir, PathBuf::from("src"));
        assert_eq!(request.metadata_path, PathBuf::from("src").join("install.rdf"));
        assert_eq!(request.output_dir, PathBuf::from("."));
        assert_eq!(request.version_override, None);
        assert_eq!(request.readme, ReadmeSource::ProjectRoot);
    }

    #[test]
    fn test_override_wins_over_metadata() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("install.rdf"), INSTALL_RDF_BODY).unwrap();

        let request = PackageRequest::new(temp_dir.path()).with_version("9.9.9");
        let version = request.resolve_version().unwrap();
        assert_eq!(version.value, "9.9.9");
        assert_eq!(version.origin, VersionOrigin::Override);
    }

    #[test]
    fn test_metadata_used_without_override() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("install.rdf"), INSTALL_RDF_BODY).unwrap();

        let version = PackageRequest::new(temp_dir.path()).resolve_version().unwrap();
        assert_eq!(version.value, "1.4.0");
        assert_eq!(version.origin, VersionOrigin::Metadata);
    }

    #[test]
    fn test_blank_override_falls_back_to_metadata() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("install.rdf"), INSTALL_RDF_BODY).unwrap();

        let version = PackageRequest::new(temp_dir.path())
            .with_version("   ")
            .resolve_version()
            .unwrap();
        assert_eq!(version.value, "1.4.0");
    }

    #[test]
    fn test_unresolved_without_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let err = PackageRequest::new(temp_dir.path()).resolve_version().unwrap_err();
        assert!(matches!(err, PackageError::VersionUnresolved(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_custom_metadata_path() {
        let temp_dir = TempDir::new().unwrap();
        let rdf = temp_dir.path().join("elsewhere.rdf");
        fs::write(&rdf, INSTALL_RDF_BODY).unwrap();

        let version = PackageRequest::new(temp_dir.path().join("src"))
            .with_metadata_path(&rdf)
            .resolve_version()
            .unwrap();
        assert_eq!(version.value, "1.4.0");
    }

    #[test]
    fn test_output_file() {
        let request = PackageRequest::new("src").with_output_dir("dist");
        assert_eq!(
            request.output_file("2.3.1"),
            PathBuf::from("dist").join("abdm-legacy-integration-2.3.1.xpi")
        );
    }

    #[test]
    fn test_readme_source_locate() {
        assert_eq!(ReadmeSource::Skip.locate(), None);
        assert_eq!(
            ReadmeSource::Path(PathBuf::from("docs/README.md")).locate(),
            Some(PathBuf::from("docs/README.md"))
        );
    }
}
