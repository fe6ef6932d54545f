//! Command-line interface for the appboot demo binary.

pub mod commands;

use clap::{Parser, Subcommand};

use commands::run::RunArgs;
use commands::write_config::WriteConfigArgs;

#[derive(Parser, Debug)]
#[command(name = "appboot", version, about = "Profile-based application bootstrap demo")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an application.yaml holding the built-in defaults
    WriteConfig(WriteConfigArgs),
}

/// Print a fatal error and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("Error: {err:#}");
    std::process::exit(1)
}
