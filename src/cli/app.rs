use super::commands::config::ConfigCommands;
use super::commands::demo::DemoCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "awaitable-popups")]
#[command(about = "Try out awaitable popups and loader overlays in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an interactive popup demo
    Demo(DemoCommands),
    /// Loader defaults management
    Config(ConfigCommands),
}
