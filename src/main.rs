//! AB Download Manager legacy XPI builder CLI

use abdm_xpi::models::EXIT_FAILURE;
use abdm_xpi::{package_extension_with, PackageError, PackageRequest, ReadmeSource};
use clap::{ArgAction, Parser};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "build-xpi")]
#[command(about = "Create the abdm XPI (store mode, no compression)", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Source directory to package
    #[arg(long, default_value = "src", value_name = "DIR")]
    src: PathBuf,

    /// install.rdf to read the version from (default: <src>/install.rdf)
    #[arg(long = "install-rdf", value_name = "FILE")]
    install_rdf: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = ".", value_name = "DIR")]
    out: PathBuf,

    /// Override the version string
    #[arg(long, value_name = "VERSION")]
    version: Option<String>,

    /// README to place at the archive root (default: README.md above the tool's directory)
    #[arg(long, value_name = "FILE", conflicts_with = "no_readme")]
    readme: Option<PathBuf>,

    /// Do not add a README at the archive root
    #[arg(long)]
    no_readme: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn request(&self) -> PackageRequest {
        let mut request = PackageRequest::new(&self.src).with_output_dir(&self.out);

        if let Some(install_rdf) = &self.install_rdf {
            request = request.with_metadata_path(install_rdf);
        }
        if let Some(version) = &self.version {
            request = request.with_version(version);
        }

        let readme = match (&self.readme, self.no_readme) {
            (_, true) => ReadmeSource::Skip,
            (Some(path), false) => ReadmeSource::Path(path.clone()),
            (None, false) => ReadmeSource::ProjectRoot,
        };
        request.with_readme(readme)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli.request()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("ERROR: {}", e).red().bold());
            ExitCode::from(exit_status(&e))
        }
    }
}

fn run(request: &PackageRequest) -> Result<(), PackageError> {
    let outcome = package_extension_with(request, |_, output_file| {
        println!(
            "Packaging '{}' -> '{}' {}",
            request.source_dir.display(),
            output_file.display(),
            "(store, no compression)".dimmed()
        );
    })?;

    let summary = outcome.summary;
    println!("{} {}", "Created:".green().bold(), summary.output.display());
    println!("  - Files: {}", summary.entry_count());
    if summary.readme_included {
        println!("  - README.md added at archive root");
    }

    Ok(())
}

fn exit_status(err: &PackageError) -> u8 {
    u8::try_from(err.exit_code()).unwrap_or(EXIT_FAILURE as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["build-xpi"]).unwrap();
        let request = cli.request();
        assert_eq!(request.source_dir, PathBuf::from("src"));
        assert_eq!(request.metadata_path, PathBuf::from("src").join("install.rdf"));
        assert_eq!(request.output_dir, PathBuf::from("."));
        assert_eq!(request.version_override, None);
        assert_eq!(request.readme, ReadmeSource::ProjectRoot);
    }

    #[test]
    fn test_version_is_an_override_not_a_flag() {
        let cli = Cli::try_parse_from(["build-xpi", "--version", "2.3.1"]).unwrap();
        assert_eq!(cli.request().version_override.as_deref(), Some("2.3.1"));
    }

    #[test]
    fn test_install_rdf_follows_src() {
        let cli = Cli::try_parse_from(["build-xpi", "--src", "addon"]).unwrap();
        assert_eq!(cli.request().metadata_path, PathBuf::from("addon").join("install.rdf"));

        let cli =
            Cli::try_parse_from(["build-xpi", "--src", "addon", "--install-rdf", "meta.rdf"]).unwrap();
        assert_eq!(cli.request().metadata_path, PathBuf::from("meta.rdf"));
    }

    #[test]
    fn test_readme_options() {
        let cli = Cli::try_parse_from(["build-xpi", "--no-readme"]).unwrap();
        assert_eq!(cli.request().readme, ReadmeSource::Skip);

        let cli = Cli::try_parse_from(["build-xpi", "--readme", "docs/README.md"]).unwrap();
        assert_eq!(
            cli.request().readme,
            ReadmeSource::Path(PathBuf::from("docs/README.md"))
        );

        assert!(Cli::try_parse_from(["build-xpi", "--readme", "x", "--no-readme"]).is_err());
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&PackageError::VersionUnresolved(PathBuf::from("x"))), 2);
        assert_eq!(exit_status(&PackageError::MissingSource(PathBuf::from("x"))), 1);
    }
}
