//! Appboot - profile-based application bootstrap
//!
//! Appboot discovers `<prefix>.yaml` and `<prefix>-<env>.yaml` profiles,
//! binds the default profile and then the active environment's profile into
//! caller-registered configuration targets, and configures logging
//! (level, format, rotating file output) from the bound `boot` section.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): Configuration models and error types
//! - **Application Layer** (`application`): The [`AppContext`] lifecycle
//! - **Infrastructure Layer** (`infrastructure`): Profile loading, binding and logging
//! - **CLI Layer** (`cli`): Demo command-line interface
//!
//! # Example
//!
//! ```ignore
//! use appboot::AppContext;
//!
//! let mut ctx = AppContext::new();
//! ctx.register_config(ServerSettings::default());
//! ctx.init()?;
//! tracing::info!(env = ctx.env(), "started");
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use application::AppContext;
pub use domain::models::{BootConfig, BootDocument, LogFormat, LogSettings};
pub use domain::{ConfigError, ConfigResult};
pub use infrastructure::config::{Bindable, ConfigLoader, LoadReport, ProfileTree, Registration};
pub use infrastructure::logging::LoggerImpl;
