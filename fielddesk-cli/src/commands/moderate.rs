use std::path::PathBuf;

use anyhow::Result;
use chat::ChatConsole;
use clap::Args;
use shared::Config;

use super::confirm;

#[derive(Args, Debug)]
#[command(about = "Delete a single message after confirmation")]
pub struct DeleteMessageArgs {
    /// Path to the configuration file (yaml or json)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Message id to delete
    #[arg()]
    pub id: i64,

    /// Room the message belongs to; opening it makes the removal visible
    /// locally before the server confirms
    #[arg(long)]
    pub room: Option<String>,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub yes: bool,
}

pub async fn delete_message(args: DeleteMessageArgs) -> Result<()> {
    confirm(
        &format!("Delete message {}? It will be permanently removed.", args.id),
        args.yes,
    )?;

    let config = Config::load_config(args.config).map_err(|e| anyhow::anyhow!(e))?;
    super::init_tracing(&config);

    let console = ChatConsole::from_config(&config)?;
    if let Some(room) = &args.room {
        console.open_room(room).await?;
    }

    let result = console.moderator().delete_message(args.id).await;
    console.unmount();
    result?;

    println!("Message {} deleted.", args.id);
    Ok(())
}

#[derive(Args, Debug)]
#[command(about = "Delete every message in a room after confirmation")]
pub struct DeleteThreadArgs {
    /// Path to the configuration file (yaml or json)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Room to wipe
    #[arg()]
    pub room: String,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub yes: bool,
}

pub async fn delete_thread(args: DeleteThreadArgs) -> Result<()> {
    confirm(
        &format!(
            "Delete thread '{}'? This is irreversible and removes every message in the room.",
            args.room
        ),
        args.yes,
    )?;

    let config = Config::load_config(args.config).map_err(|e| anyhow::anyhow!(e))?;
    super::init_tracing(&config);

    let console = ChatConsole::from_config(&config)?;
    let result = console.moderator().delete_thread(&args.room).await;
    console.unmount();
    result?;

    println!("Thread '{}' deleted.", args.room);
    Ok(())
}
