//! Config file loading

use serde_yaml::{Mapping, Value as YamlValue};
use std::fs;
use std::path::Path;

use super::error::{ConfigError, Result};
use super::merge::{merge_list_into, merge_tree_into};
use super::schema::Config;

/// Load a config file and merge it into `cfg`.
///
/// `.toml` files are parsed with the TOML parser; every other extension
/// (`.yml`, `.yaml`, `.json` or none) is read as YAML.
pub fn merge_file_into(cfg: &mut Config, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    let tree = parse_config_text(&content, path)?;
    if tree.is_empty() {
        tracing::warn!("Config file {} is empty; nothing to merge", path.display());
        return Ok(());
    }

    merge_tree_into(&tree, cfg)?;
    tracing::info!("Merged config file {}", path.display());
    Ok(())
}

impl Config {
    /// Defaults rooted at `root`, then each file in order, then the
    /// command-line pairs.
    pub fn from_sources<P, S>(root: &Path, files: &[P], pairs: &[S]) -> Result<Config>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let mut cfg = Config::with_root(root);
        for file in files {
            merge_file_into(&mut cfg, file.as_ref())?;
        }
        merge_list_into(&mut cfg, pairs)?;
        Ok(cfg)
    }

    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        merge_file_into(self, path.as_ref())
    }

    pub fn merge_list<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<()> {
        merge_list_into(self, pairs)
    }
}

fn parse_config_text(content: &str, config_file: &Path) -> Result<Mapping> {
    // Blank or comment-only documents merge nothing
    if content.lines().map(str::trim).all(|line| line.is_empty() || line.starts_with('#')) {
        return Ok(Mapping::new());
    }

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let raw = match ext.as_str() {
        "toml" => parse_toml(content, config_file)?,
        _ => serde_yaml::from_str::<YamlValue>(content)
            .map_err(|e| parse_error(config_file, format!("invalid YAML syntax: {e}")))?,
    };

    match raw {
        YamlValue::Mapping(mapping) => Ok(mapping),
        // Empty document
        YamlValue::Null => Ok(Mapping::new()),
        _ => Err(parse_error(config_file, "expected a mapping of config keys at the top level")),
    }
}

/// Parse TOML and convert it into the same tree shape as a YAML document.
fn parse_toml(content: &str, config_file: &Path) -> Result<YamlValue> {
    let raw: toml::Value = toml::from_str(content)
        .map_err(|e| parse_error(config_file, format!("invalid TOML syntax: {e}")))?;
    serde_yaml::to_value(raw).map_err(|e| parse_error(config_file, e.to_string()))
}

fn parse_error(config_file: &Path, message: impl Into<String>) -> ConfigError {
    ConfigError::Parse { path: config_file.to_path_buf(), message: message.into() }
}
