use anyhow::Result;
use awaitable_popups::PopupConfig;
use clap::Parser;
use log::info;

mod cli;
mod ui;

use cli::commands::{config_command, demo_command};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run) so prompts stay readable
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("awaitable-popups.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    let config = PopupConfig::load()?;
    info!("Starting awaitable-popups");

    match cli.command {
        Commands::Demo(args) => demo_command(args, &config).await,
        Commands::Config(args) => config_command(args, &config),
    }
}
