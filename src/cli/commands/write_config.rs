//! Implementation of the `appboot write-config` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::ConfigError;
use crate::infrastructure::config::write_default_config;

#[derive(Args, Debug)]
pub struct WriteConfigArgs {
    /// Target directory (defaults to current directory)
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

pub fn execute(args: &WriteConfigArgs) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match write_default_config(&args.dir) {
        Ok(path) => {
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        // Already reported as a warning; the existing file stays in place
        Err(ConfigError::AlreadyExists(_)) => Ok(()),
        Err(e) => Err(e).context("Failed to write default configuration"),
    }
}
