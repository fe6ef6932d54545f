//! Appboot CLI entry point.

use clap::Parser;

use appboot::cli::{commands, handle_error, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::WriteConfig(args)) => commands::write_config::execute(&args),
        None => commands::run::execute(cli.run).await,
    };

    if let Err(err) = result {
        handle_error(err);
    }
}
