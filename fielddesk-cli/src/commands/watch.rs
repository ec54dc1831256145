use std::path::PathBuf;

use anyhow::Result;
use chat::{AttachmentRender, ChatConsole, ChatEvent};
use clap::Args;
use shared::Config;
use tokio::sync::broadcast::error::RecvError;

#[derive(Args, Debug)]
#[command(about = "Watch the thread directory and optionally one room live")]
pub struct WatchArgs {
    /// Path to the configuration file (yaml or json)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Room to open on start
    #[arg(long)]
    pub room: Option<String>,
}

pub async fn run(args: WatchArgs) -> Result<()> {
    let config = Config::load_config(args.config).map_err(|e| anyhow::anyhow!(e))?;
    super::init_tracing(&config);

    let console = ChatConsole::from_config(&config)?;
    let mut events = console.subscribe();

    console.mount();
    if let Some(room) = &args.room {
        console.open_room(room).await?;
    }
    println!("Watching chat activity... press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => render_event(&console, &event),
                Err(RecvError::Lagged(skipped)) => {
                    eprintln!("warning: display fell behind, skipped {skipped} updates");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    console.unmount();
    println!("Stopped.");
    Ok(())
}

fn render_event(console: &ChatConsole, event: &ChatEvent) {
    match event {
        ChatEvent::ThreadsRefreshed { total } => {
            let as_of = console
                .last_directory_refresh()
                .map_or_else(String::new, |at| {
                    format!(" (as of {})", at.format("%H:%M:%S"))
                });
            println!("[directory] {total} threads{as_of}");
            for thread in console.threads() {
                let preview = thread
                    .last_message_text
                    .as_deref()
                    .unwrap_or("(no messages)");
                println!(
                    "  room={} messages={} last={preview}",
                    thread.room, thread.total_messages
                );
            }
        }
        ChatEvent::RoomOpened { room } => println!("[room {room}] opened"),
        ChatEvent::RoomClosed => println!("[room] closed"),
        ChatEvent::MessagesRefreshed { room, total } => {
            println!("[room {room}] {total} messages");
            for message in console.rendered_messages() {
                render_message(console, &message);
            }
        }
        ChatEvent::MessageSent { room } => println!("[room {room}] message sent"),
        ChatEvent::MessageDeleted { id } => println!("[moderation] message {id} deleted"),
        ChatEvent::ThreadWiped { room } => println!("[moderation] thread {room} wiped"),
        ChatEvent::OperationFailed { op, message } => {
            eprintln!("warning: {op} failed: {message}");
        }
    }
}

fn render_message(console: &ChatConsole, message: &chat::RenderedMessage) {
    let marker = if message.own { "*" } else { " " };
    let initials = chat::initials(&message.sender_name);
    let body = message.body.as_deref().unwrap_or("");
    let attachment = match &message.attachment {
        AttachmentRender::None => String::new(),
        AttachmentRender::Image { path } | AttachmentRender::Document { path } => {
            format!(" [attachment: {}]", console.attachment_url(path))
        }
    };

    if let Some(reply) = &message.reply {
        println!("    > {}: {}", reply.sender_name, reply.excerpt);
    }
    println!(
        " {marker} [{}] ({initials}) {}: {body}{attachment}",
        message.time_label, message.sender_name
    );
}
