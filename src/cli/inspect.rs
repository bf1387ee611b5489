//! show / get / keys commands

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use densecap_config::config::Entry;
use densecap_config::Config;

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Yaml)]
    pub format: Format,
}

#[derive(Args)]
pub struct GetArgs {
    /// Dotted key path, e.g. TRAIN.FG_THRESH
    #[arg(value_name = "KEY")]
    pub key: String,
}

pub fn show(cfg: &Config, args: &ShowArgs) -> Result<()> {
    let rendered = match args.format {
        Format::Yaml => serde_yaml::to_string(cfg).context("Failed rendering config as YAML")?,
        Format::Json => {
            serde_json::to_string_pretty(cfg).context("Failed rendering config as JSON")?
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

pub fn get(cfg: &Config, args: &GetArgs) -> Result<()> {
    match cfg.lookup(&args.key)? {
        Entry::Leaf(value) => println!("{}", value),
        subtree @ Entry::Section(_) => {
            let rendered = serde_yaml::to_string(&subtree.to_yaml())
                .context("Failed rendering config subtree")?;
            println!("{}", rendered.trim_end());
        }
    }
    Ok(())
}

pub fn keys(cfg: &Config) -> Result<()> {
    for path in cfg.leaf_paths() {
        let kind = cfg.lookup(&path)?.kind();
        println!("{}\t{}", path, kind);
    }
    Ok(())
}
