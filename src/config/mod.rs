//! Configuration store for the DenseCap training pipeline
//!
//! Holds the default settings tree and merges overrides from config files
//! and from command-line `KEY VALUE` pairs. Overrides may only touch keys that
//! already exist, and each value must match the type of the default it replaces.

pub mod dirs;
pub mod error;
pub mod loader;
pub mod merge;
pub mod schema;
pub mod value;

pub use dirs::DEFAULT_TB_LABEL;
pub use error::{ConfigError, Result};
pub use loader::merge_file_into;
pub use merge::{merge_list_into, merge_tree_into, set_override};
pub use schema::{default_root, Config, Entry, EntryMut, Section, Slot, TrainConfig};
pub use value::{Value, ValueKind};
