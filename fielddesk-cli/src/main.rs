//! Main entry point for the FieldDesk console CLI.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::error::Error;

mod commands;

/// FieldDesk CLI
#[derive(Parser)]
#[command(name = "FieldDesk CLI")]
#[command(about = "Command-line operations console for FieldDesk chat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the FieldDesk CLI
#[derive(Subcommand)]
enum Commands {
    /// List conversation threads with directory totals
    Threads(commands::threads::ThreadsArgs),
    /// Watch the thread directory and optionally one room live
    Watch(commands::watch::WatchArgs),
    /// Send a message (text and/or one attachment) into a room
    Send(commands::send::SendArgs),
    /// Delete a single message after confirmation
    DeleteMessage(commands::moderate::DeleteMessageArgs),
    /// Delete every message in a room after confirmation
    DeleteThread(commands::moderate::DeleteThreadArgs),
    /// Generate a configuration file
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts for the CLI
    Completion(commands::completion::CompletionArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Threads(args) => commands::threads::run(args).await?,
        Commands::Watch(args) => commands::watch::run(args).await?,
        Commands::Send(args) => commands::send::run(args).await?,
        Commands::DeleteMessage(args) => commands::moderate::delete_message(args).await?,
        Commands::DeleteThread(args) => commands::moderate::delete_thread(args).await?,
        Commands::Config(args) => commands::config::run(&args)?,
        Commands::Completion(args) => commands::completion::run(&args)?,
    }

    Ok(())
}
