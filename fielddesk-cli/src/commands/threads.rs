use std::path::PathBuf;

use anyhow::Result;
use chat::ChatApi;
use clap::Args;
use shared::Config;
use shared::models::ThreadListResponse;

#[derive(Args, Debug)]
#[command(about = "List conversation threads with directory totals")]
pub struct ThreadsArgs {
    /// Path to the configuration file (yaml or json)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Maximum number of threads to fetch
    #[arg(long)]
    pub limit: Option<u32>,
}

pub async fn run(args: ThreadsArgs) -> Result<()> {
    let config = Config::load_config(args.config).map_err(|e| anyhow::anyhow!(e))?;
    super::init_tracing(&config);

    let api = ChatApi::from_config(&config.api)?;
    let limit = args.limit.unwrap_or(config.chat.directory_page_size);
    let response = api.list_threads(limit).await?;
    render_thread_list(&response);
    Ok(())
}

fn render_thread_list(response: &ThreadListResponse) {
    if let Some(summary) = &response.summary {
        println!(
            "{} threads, {} messages, {} senders",
            summary.total_threads, summary.total_messages, summary.total_senders
        );
        println!();
    }

    if response.data.is_empty() {
        println!("No threads found.");
        return;
    }

    for thread in &response.data {
        println!(
            "- room={} messages={} participants={}",
            thread.room, thread.total_messages, thread.total_participants
        );
        if let Some(text) = &thread.last_message_text {
            let sender = thread.last_sender_name.as_deref().unwrap_or("unknown");
            let at = thread
                .last_message_at
                .map_or_else(|| "-".to_string(), |ts| ts.full_label());
            println!("  last: \"{text}\" by {sender} at {at}");
        }
        println!();
    }
}
