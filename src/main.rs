use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{ConfigCommand, EditCommand, ShowCommand, WatchCommand};
use endure::config::ClientConfig;

#[derive(Parser)]
#[command(name = "endure")]
#[command(version)]
#[command(about = "Edit and follow a shared daily plan", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit the plan in $EDITOR with conflict detection
    Edit(EditCommand),

    /// Show the current plan
    Show(ShowCommand),

    /// Follow the plan and report changes
    Watch(WatchCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = ClientConfig::load(cli.config)?;

    match cli.command {
        Some(Commands::Edit(cmd)) => cmd.run(&config).await?,
        Some(Commands::Show(cmd)) => cmd.run(&config).await?,
        Some(Commands::Watch(cmd)) => cmd.run(&config).await?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
