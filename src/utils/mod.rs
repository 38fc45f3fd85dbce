//! Small shared helpers

pub mod helpers;
