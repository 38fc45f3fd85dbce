//! XPI archive writer

use super::collector::collect_entries;
use crate::models::{ArchiveEntry, BuildSummary, PackageError};
use crate::utils::helpers::{project_readme_path, README_NAME};
use crate::validator::validate_source_dir;
use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};
use zip::result::ZipError;
use zip::CompressionMethod;

/// Package the contents of `source_dir` into `output_file`, taking the
/// root README from the project root.
pub fn build_archive(source_dir: &Path, output_file: &Path) -> Result<BuildSummary, PackageError> {
    build_archive_with_readme(source_dir, output_file, project_readme_path().as_deref())
}

/// Package the contents of `source_dir` into `output_file`.
///
/// Members are named relative to `source_dir`, so the directory itself never
/// appears in the archive. Everything is stored uncompressed with a fixed
/// timestamp, in member-name order. When `readme` points at a regular file it
/// is appended as `README.md` on a best-effort basis.
pub fn build_archive_with_readme(
    source_dir: &Path,
    output_file: &Path,
    readme: Option<&Path>,
) -> Result<BuildSummary, PackageError> {
    let source_dir = validate_source_dir(source_dir)?;

    if let Some(parent) = non_empty_parent(output_file) {
        fs::create_dir_all(parent)
            .map_err(|e| PackageError::io("Creating output directory", parent, e))?;
    }

    let own_path = canonical_output_path(output_file);
    let entries = collect_entries(&source_dir, own_path.as_deref());

    let file = File::create(output_file)
        .map_err(|e| PackageError::io("Creating archive", output_file, e))?;
    let mut zip = ZipWriter::new(file);
    let options = stored_options();

    let mut written = Vec::with_capacity(entries.len() + 1);
    for entry in &entries {
        log::debug!("Adding {}", entry.archive_path);
        write_entry(&mut zip, entry, options)?;
        written.push(entry.archive_path.clone());
    }

    let readme_included = match readme {
        Some(path) => inject_readme(&mut zip, path, options),
        None => false,
    };
    if readme_included {
        written.push(README_NAME.to_string());
    }

    zip.finish()?;

    log::info!(
        "Wrote {} members to {}",
        written.len(),
        output_file.display()
    );

    Ok(BuildSummary {
        output: output_file.to_path_buf(),
        entries: written,
        readme_included,
    })
}

/// Store-only members with stable metadata.
fn stored_options() -> FileOptions {
    FileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644)
}

fn write_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &ArchiveEntry,
    options: FileOptions,
) -> Result<(), PackageError> {
    let mut file = File::open(&entry.source_path)
        .map_err(|e| PackageError::io("Opening", &entry.source_path, e))?;

    zip.start_file(entry.archive_path.as_str(), options)?;
    io::copy(&mut file, zip)
        .map_err(|e| PackageError::io("Copying into archive", &entry.source_path, e))?;

    Ok(())
}

/// Best effort: a README that is missing or cannot be added leaves the
/// archive valid and the build successful.
fn inject_readme<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    readme: &Path,
    options: FileOptions,
) -> bool {
    if !readme.is_file() {
        log::debug!("No project README at {}", readme.display());
        return false;
    }

    let content = fs::read(readme).map_err(|e| PackageError::io("Reading", readme, e));
    add_readme(zip, content, options)
}

/// The README is read in full before its member is started, so a read
/// failure never leaves a partial member behind.
fn add_readme<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    content: Result<Vec<u8>, PackageError>,
    options: FileOptions,
) -> bool {
    let written = content.and_then(|content| {
        zip.start_file(README_NAME, options)?;
        zip.write_all(&content).map_err(ZipError::from)?;
        Ok(())
    });

    match written {
        Ok(()) => true,
        Err(err) => {
            log::warn!("Skipping project README: {}", err);
            false
        }
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Canonical location of the archive about to be written, used to keep it
/// out of its own entry list. Requires the parent directory to exist.
fn canonical_output_path(output_file: &Path) -> Option<PathBuf> {
    let parent = non_empty_parent(output_file).unwrap_or_else(|| Path::new("."));
    let file_name = output_file.file_name()?;
    parent.canonicalize().ok().map(|dir| dir.join(file_name))
}
