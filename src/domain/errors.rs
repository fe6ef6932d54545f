//! Domain errors for application bootstrap.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering, loading, binding or writing configuration.
///
/// Every variant except [`ConfigError::AlreadyExists`] is fatal at startup:
/// a process must not run with partially applied or mistyped settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Config file {path} is not a key/value document: {source}")]
    InvalidProfile {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Failed to bind configuration into {target}: {source}")]
    Bind {
        target: &'static str,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to serialize default configuration: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Whether this error must stop the process.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::AlreadyExists(_))
    }
}
