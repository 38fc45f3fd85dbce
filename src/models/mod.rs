//! Core data models for XPI packaging

pub mod request;
pub mod entry;
pub mod error;

pub use request::*;
pub use entry::*;
pub use error::*;
