//! Merging overrides into the store
//!
//! Two sources are supported: a parsed config file (a tree mirroring the
//! default layout) and a flat list of `KEY VALUE` pairs from the command line.
//! Neither may introduce new keys. Merges are applied in place with no rollback,
//! so a failure leaves earlier keys of the same merge applied.

use serde_yaml::{Mapping, Value as YamlValue};

use super::error::{ConfigError, Result};
use super::schema::{join_key, Config, EntryMut, Section};
use super::value::{unquote, Value, ValueKind};

/// Deep-merge `source` into `cfg`; values in `source` win.
pub fn merge_tree_into(source: &Mapping, cfg: &mut Config) -> Result<()> {
    merge_mapping(source, cfg, "")
}

fn merge_mapping(source: &Mapping, target: &mut dyn Section, prefix: &str) -> Result<()> {
    for (raw_key, value) in source {
        let path = join_key(prefix, &key_text(raw_key));
        let result = merge_entry(target, &path, raw_key, value);
        if let Err(err) = result {
            tracing::debug!("Error under config key: {}", path);
            return Err(err);
        }
    }
    Ok(())
}

fn merge_entry(
    target: &mut dyn Section,
    path: &str,
    raw_key: &YamlValue,
    value: &YamlValue,
) -> Result<()> {
    let entry =
        target.entry_mut(&key_text(raw_key)).ok_or_else(|| ConfigError::unknown_key(path))?;

    match (entry, value) {
        (EntryMut::Section(child), YamlValue::Mapping(mapping)) => {
            merge_mapping(mapping, child, path)
        }
        (EntryMut::Section(_), other) => {
            Err(ConfigError::mismatch(path, ValueKind::Tree, yaml_type_name(other)))
        }
        (EntryMut::Leaf(slot), value) => {
            let value = Value::from_yaml(value)
                .map_err(|found| ConfigError::mismatch(path, slot.kind(), found))?;
            slot.assign(value, path)?;
            tracing::debug!("Merged {} from file", path);
            Ok(())
        }
    }
}

fn key_text(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        other => yaml_type_name(other),
    }
}

fn yaml_type_name(value: &YamlValue) -> String {
    match Value::from_yaml(value) {
        Ok(leaf) => leaf.kind().to_string(),
        Err(found) => found,
    }
}

/// Apply alternating `KEY VALUE` overrides, e.g. `["TRAIN.FG_THRESH", "0.6"]`.
///
/// The pairs are applied in order. String fields take the value text as is
/// (minus one level of quotes); every other field parses it as a literal and
/// requires the literal's type to match the field.
pub fn merge_list_into<S: AsRef<str>>(cfg: &mut Config, pairs: &[S]) -> Result<()> {
    if pairs.len() % 2 != 0 {
        return Err(ConfigError::OddOverrides(pairs.len()));
    }
    for pair in pairs.chunks_exact(2) {
        set_override(cfg, pair[0].as_ref(), pair[1].as_ref())?;
    }
    Ok(())
}

/// Apply a single dotted-path override.
pub fn set_override(cfg: &mut Config, key: &str, raw: &str) -> Result<()> {
    let segments: Vec<&str> = key.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(ConfigError::unknown_key(key));
    };

    let mut section: &mut dyn Section = cfg;
    for segment in parents {
        section = match section.entry_mut(segment) {
            Some(EntryMut::Section(child)) => child,
            _ => return Err(ConfigError::unknown_key(key)),
        };
    }

    let slot = match section.entry_mut(leaf) {
        Some(EntryMut::Leaf(slot)) => slot,
        Some(EntryMut::Section(_)) => {
            let found = Value::parse_literal(raw).kind();
            return Err(ConfigError::mismatch(key, ValueKind::Tree, found));
        }
        None => return Err(ConfigError::unknown_key(key)),
    };

    let value = if slot.kind() == ValueKind::Str {
        Value::Str(unquote(raw).unwrap_or(raw).to_string())
    } else {
        Value::parse_literal(raw)
    };
    slot.assign(value, key)?;
    tracing::debug!("Set {} = {}", key, raw);
    Ok(())
}
