use std::io;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{Shell, generate};

#[derive(Args, Debug)]
#[command(about = "Generate shell completion scripts for the CLI")]
pub struct CompletionArgs {
    /// The shell type for which to generate the completion script
    #[arg(long, short)]
    pub shell: Shell,
}

pub fn run(args: &CompletionArgs) -> Result<()> {
    let mut command = crate::Cli::command();
    generate(args.shell, &mut command, "cli", &mut io::stdout());
    Ok(())
}
