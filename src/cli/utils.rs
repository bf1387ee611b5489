//! Shared CLI utilities.

use anyhow::{Context, Result};
use densecap_config::config::default_root;
use densecap_config::Config;

use super::Cli;

/// Build the configuration from the global `--root`, `--cfg` and `--set` options.
pub fn load(cli: &Cli) -> Result<Config> {
    let root = cli.root.clone().unwrap_or_else(default_root);
    let mut cfg = Config::with_root(&root);

    for file in &cli.cfg_files {
        cfg.merge_file(file)
            .with_context(|| format!("Failed merging config file {}", file.display()))?;
    }
    cfg.merge_list(cli.set.as_slice()).context("Failed applying --set overrides")?;

    Ok(cfg)
}
