//! Utility functions

pub mod paths;

pub use paths::{absolute_path, ensure_dir, normalize_path};
