use anyhow::{Result, bail};
use clap::Args;
use shared::Config;

#[derive(Args, Debug)]
#[command(about = "Generate a configuration file with defaults")]
pub struct ConfigArgs {
    /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
    #[arg(long, short)]
    pub format: Option<String>,
}

pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = Config::with_defaults();
    let rendered = match args.format.as_deref().unwrap_or("yaml") {
        "yaml" | "yml" => serde_yml::to_string(&config)?,
        "json" => serde_json::to_string_pretty(&config)?,
        other => bail!("unsupported format '{other}': use yaml or json"),
    };
    println!("{rendered}");
    Ok(())
}
