//! Domain layer for application bootstrap
//!
//! This module contains the configuration models and error types shared by
//! the loader, the logging configurer and the application context.

pub mod errors;
pub mod models;

pub use errors::{ConfigError, ConfigResult};
