//! output-dir / tensorboard-dir commands

use anyhow::Result;
use clap::Args;
use densecap_config::Config;

#[derive(Args)]
pub struct DirArgs {
    /// Dataset name, e.g. vg_1.2_train
    #[arg(value_name = "DATASET")]
    pub dataset: String,

    /// Weights/snapshot label appended to the path
    #[arg(short, long, value_name = "NAME")]
    pub weights: Option<String>,
}

pub fn output_dir(cfg: &Config, args: &DirArgs) -> Result<()> {
    let dir = cfg.output_dir(&args.dataset, args.weights.as_deref())?;
    println!("{}", dir.display());
    Ok(())
}

pub fn tensorboard_dir(cfg: &Config, args: &DirArgs) -> Result<()> {
    let dir = cfg.tensorboard_dir(&args.dataset, args.weights.as_deref())?;
    println!("{}", dir.display());
    Ok(())
}
