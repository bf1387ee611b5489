//! densecap-config: resolve the DenseCap training configuration from the command line
//!
//! Merges config files and `--set` overrides into the defaults, then prints
//! the result or derives the experiment output directories.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
