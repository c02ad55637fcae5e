//! CLI command implementations.

pub mod common;
pub mod format;
pub mod generate;
pub mod params;
pub mod paths;
pub mod set;
pub mod show;
pub mod validate;
