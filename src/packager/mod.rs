//! Archive construction

pub mod collector;
pub mod builder;

pub use builder::{build_archive, build_archive_with_readme};
pub use collector::collect_entries;
