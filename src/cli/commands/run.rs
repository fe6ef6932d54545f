//! Implementation of the default `appboot` command.
//!
//! Registers two sample configuration shapes, initializes the context and
//! then logs at a fixed interval until the process is stopped.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::application::AppContext;
use crate::infrastructure::config::{Registration, DEFAULT_PREFIX};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory holding the profile files
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Profile file name prefix
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Active environment, overriding `boot.active`
    #[arg(long, env = "APPBOOT_ACTIVE")]
    pub active: Option<String>,

    /// Milliseconds between demo log lines
    #[arg(long, default_value_t = 10)]
    pub interval_ms: u64,
}

/// `server:` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub server: Server,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub port: u16,
}

/// `proxy:` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    #[serde(default)]
    pub proxy: Proxy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proxy {
    #[serde(default)]
    pub users: Vec<i64>,
    #[serde(default)]
    pub host: String,
}

/// Build the context described by `args` with the sample targets registered.
pub fn build_context(args: &RunArgs) -> AppContext {
    let mut ctx = AppContext::new()
        .with_config_dir(&args.dir)
        .with_prefix(&args.prefix);
    if let Some(active) = &args.active {
        ctx = ctx.with_active(active);
    }

    ctx.register_configs([
        Registration::new(ServerSettings::default()),
        Registration::new(ProxySettings::default()),
    ]);
    ctx
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let mut ctx = build_context(&args);
    ctx.init().context("Failed to initialize application context")?;

    if let Some(settings) = ctx.config::<ServerSettings>() {
        info!(port = settings.server.port, "server settings");
    }
    if let Some(settings) = ctx.config::<ProxySettings>() {
        info!(host = %settings.proxy.host, users = ?settings.proxy.users, "proxy settings");
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    loop {
        ticker.tick().await;
        warn!(env = ctx.env(), "demo log WARNING");
        info!(env = ctx.env(), "demo log INFO");
        error!(env = ctx.env(), "demo log ERROR");
    }
}
