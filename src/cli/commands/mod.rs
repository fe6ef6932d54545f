//! CLI command implementations.

pub mod run;
pub mod write_config;
