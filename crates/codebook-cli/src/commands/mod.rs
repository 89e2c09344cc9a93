//! CLI command implementations.

pub mod clean;
pub mod log;
pub mod validate;
