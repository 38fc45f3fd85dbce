//! Helper utility functions

use std::path::{Component, Path, PathBuf};

/// Prefix of every packaged XPI file name.
pub const XPI_PREFIX: &str = "abdm-legacy-integration-";

/// README file name, both in the project root and inside the archive.
pub const README_NAME: &str = "README.md";

/// File name of the archive for `version`.
pub fn xpi_file_name(version: &str) -> String {
    format!("{}{}.xpi", XPI_PREFIX, version)
}

/// Archive member name for a path relative to the packaged directory.
///
/// Members are always `/`-separated, whatever the host separator is.
/// Non UTF-8 components are converted lossily.
pub fn to_archive_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `README.md` one directory above the one holding the running executable.
pub fn project_readme_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    readme_above(&exe)
}

fn readme_above(exe: &Path) -> Option<PathBuf> {
    let install_dir = exe.parent()?;
    let project_root = install_dir.parent()?;
    Some(project_root.join(README_NAME))
}
