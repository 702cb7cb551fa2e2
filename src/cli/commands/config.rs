use anyhow::Result;
use awaitable_popups::PopupConfig;
use clap::{Args, Subcommand};
use colored::Colorize;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show current loader defaults
    Show,
    /// Print the config file location
    Path,
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn config_command(args: ConfigCommands, config: &PopupConfig) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => {
            let loader = &config.loader;
            println!("{}", "Loader defaults".bold());
            println!("  switch interval: {}ms", loader.switch_interval_ms);
            println!("  loader colour:   {}", loader.loader_colour);
            println!("  backdrop colour: {}", loader.backdrop_colour);
            println!("  text colour:     {}", loader.text_colour);
            println!("  reasons:");
            for reason in &loader.reasons {
                println!("    - {}", reason);
            }
        }
        ConfigSubcommands::Path => {
            println!("{}", PopupConfig::get_config_path()?.display());
        }
        ConfigSubcommands::Init { force } => {
            let path = PopupConfig::get_config_path()?;
            if path.exists() && !force {
                println!(
                    "{} {} (use --force to overwrite)",
                    "Config already exists:".yellow(),
                    path.display()
                );
                return Ok(());
            }
            PopupConfig::default().save()?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }
    Ok(())
}
