//! Presets CLI
//!
//! Loads a preset configuration and folds extension points across it.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Some(cmd) => execute_command(cmd).await,
        None => {
            println!("{} Preset composer CLI", "presets".green().bold());
            println!();
            println!("Run {} for available commands.", "presets --help".cyan());
            Ok(())
        }
    }
}

async fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List { config, json } => commands::run_list(&config, json).await,
        Commands::Apply {
            extension,
            config,
            initial,
            args,
        } => commands::run_apply(&config, &extension, initial.as_deref(), args.as_deref()).await,
        Commands::Resolve { specifier, dir } => commands::run_resolve(&specifier, &dir),
    }
}
