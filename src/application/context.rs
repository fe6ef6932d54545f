//! Application context
//!
//! The context is built explicitly, receives its configuration targets,
//! and is then initialized once:
//!
//! ```ignore
//! let mut ctx = AppContext::new();
//! ctx.register_config(ServerSettings::default());
//! ctx.init()?;
//! let server = ctx.config::<ServerSettings>();
//! ```

use std::any::Any;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::models::{BootConfig, BootDocument};
use crate::domain::ConfigResult;
use crate::infrastructure::config::{
    write_default_config, Bindable, ConfigLoader, ConfigRegistry, LoadReport, Registration,
    DEFAULT_PREFIX,
};
use crate::infrastructure::logging::LoggerImpl;

/// Bootstrap state shared by the rest of the application
#[derive(Debug)]
pub struct AppContext {
    config_dir: PathBuf,
    prefix: String,
    active_override: Option<String>,
    boot: BootDocument,
    registry: ConfigRegistry,
    logger: Option<LoggerImpl>,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    /// Context reading `application*.yaml` from the working directory
    pub fn new() -> Self {
        Self {
            config_dir: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            active_override: None,
            boot: BootDocument::default(),
            registry: ConfigRegistry::new(),
            logger: None,
        }
    }

    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Use `env` as the active environment instead of `boot.active`
    #[must_use]
    pub fn with_active(mut self, env: impl Into<String>) -> Self {
        self.active_override = Some(env.into());
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Append one configuration target
    pub fn register_config<T>(&mut self, target: T) -> &mut Self
    where
        T: Bindable + Any + Send + Sync,
    {
        self.registry.register(Registration::new(target));
        self
    }

    /// Append several configuration targets, possibly of different types
    pub fn register_configs<I>(&mut self, targets: I) -> &mut Self
    where
        I: IntoIterator<Item = Registration>,
    {
        self.registry.extend(targets);
        self
    }

    /// Number of registered targets
    pub fn configs_len(&self) -> usize {
        self.registry.len()
    }

    /// Discover, parse and bind every profile without touching logging.
    ///
    /// # Errors
    /// Returns the first parse or bind failure. Such failures are fatal:
    /// the process must not continue with partially applied settings.
    pub fn load(&mut self) -> ConfigResult<LoadReport> {
        let loader = ConfigLoader::new(&self.config_dir, &self.prefix);
        loader.load_and_bind(
            self.active_override.as_deref(),
            &mut self.boot,
            &mut self.registry,
        )
    }

    /// Load and bind configuration, then configure logging from it.
    ///
    /// Logging is configured on the first successful call only. Later calls
    /// rebind configuration but keep the logger already installed, since the
    /// process-wide subscriber writes through its file guard.
    ///
    /// # Errors
    /// Returns the first parse or bind failure; logging is only configured
    /// once binding succeeded.
    pub fn init(&mut self) -> ConfigResult<LoadReport> {
        let report = self.load()?;
        if self.logger.is_none() {
            self.logger = Some(LoggerImpl::init(&self.boot.boot.log));
        }

        match &report.default_profile {
            Some(path) => info!(path = %path.display(), "loaded default profile"),
            None => info!(
                dir = %self.config_dir.display(),
                "no {}.yaml found, using built-in defaults",
                self.prefix
            ),
        }
        for env in &report.environments {
            info!(env = %env, "found environment profile");
        }
        if let Some(path) = &report.environment_profile {
            info!(env = %report.active, path = %path.display(), "applied environment profile");
        }

        Ok(report)
    }

    /// Bound bootstrap configuration
    pub fn boot(&self) -> &BootConfig {
        &self.boot.boot
    }

    /// Active environment name
    pub fn env(&self) -> &str {
        &self.boot.boot.active
    }

    /// First registered target of type `T`
    pub fn config<T: Any>(&self) -> Option<&T> {
        self.registry.get::<T>()
    }

    /// Logger installed by [`AppContext::init`]
    pub fn logger(&self) -> Option<&LoggerImpl> {
        self.logger.as_ref()
    }

    /// Write a fresh `application.yaml` with the built-in defaults into
    /// the config directory. An existing file is left untouched.
    ///
    /// # Errors
    /// See [`write_default_config`].
    pub fn write_default_config(&self) -> ConfigResult<PathBuf> {
        write_default_config(&self.config_dir)
    }
}
