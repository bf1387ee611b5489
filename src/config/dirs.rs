//! Experiment output directories derived from the store

use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use super::schema::Config;
use crate::utils::{absolute_path, ensure_dir};

/// Label used for tensorboard runs when no weights name is given.
pub const DEFAULT_TB_LABEL: &str = "default";

impl Config {
    /// Directory where experimental artifacts are placed:
    /// `ROOT_DIR/output/EXP_DIR/<dataset>[/<weights>]`. Created if missing.
    pub fn output_dir(&self, dataset: &str, weights: Option<&str>) -> Result<PathBuf> {
        let mut dir = self.experiment_dir("output", dataset)?;
        if let Some(weights) = weights {
            dir.push(weights);
        }
        create(&dir)?;
        Ok(dir)
    }

    /// Directory where tensorboard summaries are placed:
    /// `ROOT_DIR/tensorboard/EXP_DIR/<dataset>/<weights or "default">`.
    /// Created if missing.
    pub fn tensorboard_dir(&self, dataset: &str, weights: Option<&str>) -> Result<PathBuf> {
        let mut dir = self.experiment_dir("tensorboard", dataset)?;
        dir.push(weights.unwrap_or(DEFAULT_TB_LABEL));
        create(&dir)?;
        Ok(dir)
    }

    fn experiment_dir(&self, kind: &str, dataset: &str) -> Result<PathBuf> {
        let dir = self.root_dir.join(kind).join(&self.exp_dir).join(dataset);
        absolute_path(&dir).map_err(|source| ConfigError::CreateDir { path: dir, source })
    }
}

fn create(dir: &Path) -> Result<()> {
    ensure_dir(dir).map_err(|source| ConfigError::CreateDir { path: dir.to_path_buf(), source })?;
    tracing::debug!("Using directory {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir_without_weights() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = Config::with_root(tmp.path());

        let dir = cfg.output_dir("vg", None).expect("output dir");
        assert_eq!(dir, tmp.path().join("output").join("default").join("vg"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_output_dir_with_weights() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = Config::with_root(tmp.path());

        let dir = cfg.output_dir("vg", Some("modelA")).expect("output dir");
        assert_eq!(dir, tmp.path().join("output/default/vg/modelA"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_output_dir_follows_exp_dir() {
        let tmp = TempDir::new().expect("tmp");
        let mut cfg = Config::with_root(tmp.path());
        cfg.merge_list(&["EXP_DIR", "densecap_vgg16"]).expect("override");

        let dir = cfg.output_dir("vg_1.2_train", None).expect("output dir");
        assert!(dir.ends_with("output/densecap_vgg16/vg_1.2_train"));
    }

    #[test]
    fn test_tensorboard_dir_labels() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = Config::with_root(tmp.path());

        let fallback = cfg.tensorboard_dir("vg", None).expect("tb dir");
        assert_eq!(fallback, tmp.path().join("tensorboard/default/vg/default"));
        assert!(fallback.is_dir());

        let named = cfg.tensorboard_dir("vg", Some("modelA")).expect("tb dir");
        assert!(named.ends_with("vg/modelA"));
        assert!(named.is_dir());
    }

    #[test]
    fn test_dirs_are_idempotent() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = Config::with_root(tmp.path());

        let first = cfg.output_dir("vg", Some("modelA")).expect("first");
        let second = cfg.output_dir("vg", Some("modelA")).expect("second");
        assert_eq!(first, second);
        cfg.tensorboard_dir("vg", None).expect("first");
        cfg.tensorboard_dir("vg", None).expect("second");
    }

    #[test]
    fn test_root_is_normalized() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = Config::with_root(tmp.path().join("nested/.."));
        let dir = cfg.output_dir("vg", None).expect("output dir");
        assert_eq!(dir, tmp.path().join("output/default/vg"));
    }

    #[test]
    fn test_blocked_path_is_create_dir_error() {
        let tmp = TempDir::new().expect("tmp");
        std::fs::write(tmp.path().join("output"), "not a dir").expect("write");
        let cfg = Config::with_root(tmp.path());
        let err = cfg.output_dir("vg", None).unwrap_err();
        assert!(matches!(err, ConfigError::CreateDir { .. }));
    }
}
