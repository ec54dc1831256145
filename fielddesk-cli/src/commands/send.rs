use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chat::{AttachmentUpload, ChatConsole, SendOutcome};
use clap::Args;
use shared::Config;

#[derive(Args, Debug)]
#[command(about = "Send a message (text and/or one attachment) into a room")]
pub struct SendArgs {
    /// Path to the configuration file (yaml or json)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Target room
    #[arg(long)]
    pub room: String,

    /// Message text
    #[arg()]
    pub message: Option<String>,

    /// Path to a file to attach
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

pub async fn run(args: SendArgs) -> Result<()> {
    let config = Config::load_config(args.config).map_err(|e| anyhow::anyhow!(e))?;
    super::init_tracing(&config);

    let console = ChatConsole::from_config(&config)?;
    console.open_room(&args.room).await?;

    if let Some(text) = &args.message {
        console.composer().stage_text(text.clone());
    }
    if let Some(path) = &args.file {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read attachment {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment")
            .to_string();
        console.composer().stage_attachment(AttachmentUpload { file_name, bytes });
    }

    let outcome = console.composer().send().await;
    console.unmount();

    match outcome? {
        SendOutcome::Sent => println!("Message sent to {}.", args.room),
        SendOutcome::Skipped => bail!("nothing to send: provide message text or --file"),
    }
    Ok(())
}
