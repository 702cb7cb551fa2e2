use anyhow::{Context, Result};
use awaitable_popups::{MemoryNavigation, PopupConfig, PopupNavigation, PopupService};
use clap::{Args, Subcommand};
use colored::Colorize;
use log::info;
use std::sync::Arc;
use std::time::Duration;

use crate::ui::TerminalPresenter;

#[derive(Args)]
pub struct DemoCommands {
    #[command(subcommand)]
    pub command: DemoSubcommands,
}

#[derive(Subcommand)]
pub enum DemoSubcommands {
    /// Ask a yes/no question and print the answer
    Confirm {
        /// Popup title
        #[arg(long, default_value = "Confirm")]
        title: String,
        /// Question to ask
        #[arg(long, default_value = "Do you want to continue?")]
        message: String,
    },
    /// Show a message and wait for acknowledgement
    Alert {
        #[arg(long, default_value = "Notice")]
        title: String,
        #[arg(long, default_value = "Something happened.")]
        message: String,
    },
    /// Ask for a line of text
    Input {
        #[arg(long, default_value = "Input")]
        title: String,
        #[arg(long, default_value = "What is your name?")]
        message: String,
    },
    /// Run a fake job behind a loader overlay
    Loader {
        /// How long the fake job runs
        #[arg(short, long, default_value_t = 5)]
        seconds: u64,
        /// Status reasons to rotate through (defaults come from the config file)
        #[arg(short, long)]
        reason: Vec<String>,
        /// Make the fake job fail
        #[arg(long)]
        fail: bool,
    },
}

pub async fn demo_command(args: DemoCommands, config: &PopupConfig) -> Result<()> {
    let navigation: Arc<dyn PopupNavigation> = Arc::new(MemoryNavigation::new());
    let _presenter = TerminalPresenter::attach(&navigation, tokio::runtime::Handle::current());

    let service = PopupService::builder(navigation)
        .loader_defaults(config.loader_config()?)
        .build()
        .context("Failed to start popup service")?;

    match args.command {
        DemoSubcommands::Confirm { title, message } => {
            let accepted = service.confirm(&title, &message).await?;
            println!("Answer: {}", if accepted { "yes".green() } else { "no".red() });
        }
        DemoSubcommands::Alert { title, message } => {
            service.alert(&title, &message).await?;
            println!("{}", "Acknowledged".green());
        }
        DemoSubcommands::Input { title, message } => {
            match service.prompt_text(&title, &message).await? {
                Some(text) => println!("You entered: {}", text.bold()),
                None => println!("{}", "Cancelled".yellow()),
            }
        }
        DemoSubcommands::Loader {
            seconds,
            reason,
            fail,
        } => {
            let mut loader = service.loader_defaults().clone();
            if !reason.is_empty() {
                loader = awaitable_popups::LoaderConfig::new(reason)?
                    .with_switch_interval(loader.switch_interval())?
                    .with_loader_colour(loader.loader_colour())
                    .with_backdrop_colour(loader.backdrop_colour())
                    .with_text_colour(loader.text_colour());
            }

            info!("Running fake job for {}s behind a loader", seconds);
            let job = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(seconds)).await;
                if fail {
                    anyhow::bail!("fake job failed after {}s", seconds);
                }
                Ok(seconds)
            });

            let outcome = service.wrap_returnable_in_loader(job, loader).await?;
            match outcome {
                Ok(seconds) => println!("{}", format!("Job finished after {}s", seconds).green()),
                Err(e) => println!("{}", format!("Job failed: {}", e).red()),
            }
        }
    }

    // Let the UI context finish closing whatever is still on screen.
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(())
}
