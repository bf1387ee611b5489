//! densecap-config: configuration store for DenseCap training and evaluation
//!
//! Builds the default settings tree, merges YAML/TOML files and command-line
//! overrides into it, and derives the per-experiment output directories.
//!
//! ```no_run
//! use densecap_config::Config;
//!
//! let mut cfg = Config::default();
//! cfg.merge_file("experiments/cfgs/densecap.yml")?;
//! cfg.merge_list(&["TRAIN.FG_THRESH", "0.6"])?;
//! let out = cfg.output_dir("vg_1.2_train", Some("vgg16"))?;
//! # Ok::<(), densecap_config::ConfigError>(())
//! ```

pub mod config;
pub mod utils;

pub use config::{Config, ConfigError, TrainConfig, Value, ValueKind};
