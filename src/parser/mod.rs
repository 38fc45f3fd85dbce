//! Parsing of extension metadata

pub mod install_rdf;

pub use install_rdf::{lookup_version, resolve_version, VersionLookup};
