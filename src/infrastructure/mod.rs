//! Infrastructure layer module
//!
//! This module contains the adapters over external libraries:
//! - Configuration management (figment, serde_yaml)
//! - Logging infrastructure (tracing, tracing-appender, zip)

pub mod config;
pub mod logging;
