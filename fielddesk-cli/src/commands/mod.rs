//! CLI subcommand implementations.

use std::io::{self, Write};

use anyhow::bail;
use shared::Config;
use tracing_subscriber::EnvFilter;

pub mod completion;
pub mod config;
pub mod moderate;
pub mod send;
pub mod threads;
pub mod watch;

/// Initializes tracing from the configured log level; `RUST_LOG` wins when
/// set.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Interactive y/N gate in front of destructive operations.
pub fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<()> {
    if assume_yes {
        return Ok(());
    }

    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    if line.trim().eq_ignore_ascii_case("y") {
        Ok(())
    } else {
        bail!("aborted");
    }
}
