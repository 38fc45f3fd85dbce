//! AB Download Manager legacy extension packager
//!
//! Builds the `abdm-legacy-integration-<version>.xpi` archive from the
//! extension source tree. The version comes from an explicit override or from
//! `<em:version>` in `install.rdf`; the archive is store-only and rooted at
//! the contents of the source directory.

pub mod models;
pub mod parser;
pub mod packager;
pub mod validator;
pub mod utils;

pub use models::{
    ArchiveEntry, BuildSummary, PackageError, PackageRequest, ReadmeSource, ResolvedVersion,
    VersionOrigin,
};
pub use packager::{build_archive, build_archive_with_readme};
pub use parser::{lookup_version, resolve_version, VersionLookup};

use std::path::Path;

/// Outcome of a successful packaging run.
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub version: ResolvedVersion,
    pub summary: BuildSummary,
}

/// Main entry point: resolve the version, name the output and build it.
///
/// Nothing is created on disk when the version cannot be determined.
pub fn package_extension(request: &PackageRequest) -> Result<PackageOutcome, PackageError> {
    package_extension_with(request, |_, _| {})
}

/// Like [`package_extension`], calling `before_build` with the resolved
/// version and output file once both are known and before anything is written.
pub fn package_extension_with<F>(
    request: &PackageRequest,
    before_build: F,
) -> Result<PackageOutcome, PackageError>
where
    F: FnOnce(&ResolvedVersion, &Path),
{
    // 1. Resolve version (override, then install.rdf)
    let version = request.resolve_version()?;

    // 2. Derive output file name
    let output_file = request.output_file(&version.value);
    log::info!(
        "Packaging {} as version {} ({:?})",
        request.source_dir.display(),
        version.value,
        version.origin
    );

    before_build(&version, &output_file);

    // 3. Build the archive
    let readme = request.readme.locate();
    let summary = build_archive_with_readme(&request.source_dir, &output_file, readme.as_deref())?;

    Ok(PackageOutcome { version, summary })
}
