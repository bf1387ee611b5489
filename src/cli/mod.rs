//! Command-line interface for densecap-config
//!
//! Loads the configuration the same way a training entry point does (defaults,
//! then `--cfg` files, then `--set` pairs) and inspects the result.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod dirs;
mod inspect;
mod utils;

/// Inspect and resolve the DenseCap training configuration
#[derive(Parser)]
#[command(name = "densecap-config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root the default directories are derived from
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Config file (YAML or TOML) merged into the defaults; repeatable
    #[arg(long = "cfg", global = true, value_name = "FILE")]
    cfg_files: Vec<PathBuf>,

    /// Override one key after the files, e.g. --set TRAIN.FG_THRESH 0.6; repeatable
    #[arg(
        long = "set",
        global = true,
        num_args = 2,
        value_names = ["KEY", "VALUE"],
        allow_hyphen_values = true
    )]
    set: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged configuration
    Show(inspect::ShowArgs),

    /// Print the value at a dotted key path
    Get(inspect::GetArgs),

    /// List every dotted key path with its type
    Keys,

    /// Create and print the output directory for a dataset
    OutputDir(dirs::DirArgs),

    /// Create and print the tensorboard directory for a dataset
    TensorboardDir(dirs::DirArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let cfg = utils::load(&cli)?;

    match cli.command {
        Commands::Show(args) => inspect::show(&cfg, &args),
        Commands::Get(args) => inspect::get(&cfg, &args),
        Commands::Keys => inspect::keys(&cfg),
        Commands::OutputDir(args) => dirs::output_dir(&cfg, &args),
        Commands::TensorboardDir(args) => dirs::tensorboard_dir(&cfg, &args),
    }
}
