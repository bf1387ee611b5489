//! Typed configuration tree and its dotted-key lookup table
//!
//! The tree is a fixed schema: `Config` holds the MISC settings plus the
//! `TRAIN` subtree. [`Section`] maps the upper-case external key names onto
//! typed fields so overrides can be applied by dotted path.

use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use super::value::{Value, ValueKind};

/// Training options consumed by the detection and captioning trainers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TrainConfig {
    /// Region proposal source used during training
    pub proposal_method: String,
    /// Use horizontally-flipped images during training
    pub use_flipped: bool,
    /// Overlap threshold for a ROI to be considered foreground (if >= FG_THRESH)
    pub fg_thresh: f64,
    /// ROIs with overlap in [BG_THRESH_LO, BG_THRESH_HI) are background
    pub bg_thresh_hi: f64,
    pub bg_thresh_lo: f64,
    /// Use the RPN to detect objects
    pub has_rpn: bool,
    /// Train bounding-box regressors
    pub bbox_reg: bool,
    /// Normalize regression targets (subtract mean, divide by stddev)
    pub bbox_normalize_targets: bool,
    /// Use the precomputed means and stds below (requires BBOX_NORMALIZE_TARGETS)
    pub bbox_normalize_targets_precomputed: bool,
    pub bbox_normalize_means: [f64; 4],
    pub bbox_normalize_stds: [f64; 4],
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            proposal_method: "gt".to_string(),
            use_flipped: true,
            fg_thresh: 0.5,
            bg_thresh_hi: 0.5,
            bg_thresh_lo: 0.1,
            has_rpn: true,
            bbox_reg: true,
            bbox_normalize_targets: true,
            bbox_normalize_targets_precomputed: false,
            bbox_normalize_means: [0.0, 0.0, 0.0, 0.0],
            bbox_normalize_stds: [0.1, 0.1, 0.2, 0.2],
        }
    }
}

/// The full configuration store.
///
/// Built once at startup (see [`Config::with_root`]), optionally mutated by
/// merges, then handed by reference to whatever consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    pub train: TrainConfig,
    /// Root directory of the project
    pub root_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// Dataset splits directory
    pub split_dir: PathBuf,
    /// Outputs are grouped under this experiment directory name
    pub exp_dir: String,
    /// Host has too little memory to load the whole region description file
    pub limit_ram: bool,
    /// For reproducibility
    pub rng_seed: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_root(default_root())
    }
}

/// Project root the defaults are derived from when none is given.
pub fn default_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

impl Config {
    /// Default configuration with every directory derived from `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root_dir = root.as_ref().to_path_buf();
        let data_dir = root_dir.join("data");
        Self {
            train: TrainConfig::default(),
            log_dir: root_dir.join("logs"),
            cache_dir: data_dir.clone(),
            split_dir: root_dir.join("info"),
            data_dir,
            root_dir,
            exp_dir: "default".to_string(),
            limit_ram: true,
            rng_seed: 3,
        }
    }

    /// Resolve a dotted path such as `TRAIN.FG_THRESH` to a leaf or subtree.
    pub fn lookup(&self, dotted: &str) -> Result<Entry<'_>> {
        let mut entry = Entry::Section(self);
        for segment in dotted.split('.') {
            let Entry::Section(section) = entry else {
                return Err(ConfigError::unknown_key(dotted));
            };
            entry = section.entry(segment).ok_or_else(|| ConfigError::unknown_key(dotted))?;
        }
        Ok(entry)
    }

    /// Leaf value at a dotted path, `None` for unknown paths and subtrees.
    pub fn get(&self, dotted: &str) -> Option<Value> {
        match self.lookup(dotted) {
            Ok(Entry::Leaf(value)) => Some(value),
            _ => None,
        }
    }

    /// Every dotted leaf path, in declaration order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaf_paths(self, "", &mut paths);
        paths
    }
}

fn collect_leaf_paths(section: &dyn Section, prefix: &str, out: &mut Vec<String>) {
    for key in section.keys() {
        let path = join_key(prefix, key);
        match section.entry(key) {
            Some(Entry::Section(child)) => collect_leaf_paths(child, &path, out),
            Some(Entry::Leaf(_)) => out.push(path),
            None => {}
        }
    }
}

pub(crate) fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Read access to a child of a [`Section`].
pub enum Entry<'a> {
    Leaf(Value),
    Section(&'a dyn Section),
}

impl Entry<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Entry::Leaf(value) => value.kind(),
            Entry::Section(_) => ValueKind::Tree,
        }
    }

    /// Render the entry as a YAML value (subtrees become mappings).
    pub fn to_yaml(&self) -> YamlValue {
        match self {
            Entry::Leaf(value) => leaf_to_yaml(value),
            Entry::Section(section) => {
                let mut mapping = Mapping::new();
                for key in section.keys() {
                    if let Some(child) = section.entry(key) {
                        mapping.insert(YamlValue::String(key.to_string()), child.to_yaml());
                    }
                }
                YamlValue::Mapping(mapping)
            }
        }
    }
}

fn leaf_to_yaml(value: &Value) -> YamlValue {
    match value {
        Value::Bool(b) => YamlValue::Bool(*b),
        Value::Int(i) => YamlValue::Number((*i).into()),
        Value::Float(x) => YamlValue::Number((*x).into()),
        Value::Str(s) => YamlValue::String(s.clone()),
        Value::Tuple(items) => {
            YamlValue::Sequence(items.iter().map(|x| YamlValue::Number((*x).into())).collect())
        }
    }
}

/// Mutable access to a child of a [`Section`].
pub enum EntryMut<'a> {
    Leaf(Slot<'a>),
    Section(&'a mut dyn Section),
}

/// A typed leaf field that an override can be written into.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    Int(&'a mut i64),
    Float(&'a mut f64),
    Str(&'a mut String),
    Path(&'a mut PathBuf),
    Tuple(&'a mut [f64; 4]),
}

impl Slot<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Slot::Bool(_) => ValueKind::Bool,
            Slot::Int(_) => ValueKind::Int,
            Slot::Float(_) => ValueKind::Float,
            Slot::Str(_) | Slot::Path(_) => ValueKind::Str,
            Slot::Tuple(t) => ValueKind::Tuple(t.len()),
        }
    }

    /// Store `value` if its type matches the field.
    ///
    /// A sequence is accepted for a tuple field when the lengths agree; any
    /// other mismatch is an error naming `key`.
    pub fn assign(self, value: Value, key: &str) -> Result<()> {
        match (self, value) {
            (Slot::Bool(field), Value::Bool(v)) => *field = v,
            (Slot::Int(field), Value::Int(v)) => *field = v,
            (Slot::Float(field), Value::Float(v)) => *field = v,
            (Slot::Str(field), Value::Str(v)) => *field = v,
            (Slot::Path(field), Value::Str(v)) => *field = PathBuf::from(v),
            (Slot::Tuple(field), Value::Tuple(v)) if v.len() == field.len() => {
                field.copy_from_slice(&v);
            }
            (slot, value) => return Err(ConfigError::mismatch(key, slot.kind(), value.kind())),
        }
        Ok(())
    }
}

/// Lookup table from external key names to fields of one subtree.
pub trait Section {
    /// Key names in declaration order.
    fn keys(&self) -> &'static [&'static str];

    fn entry(&self, key: &str) -> Option<Entry<'_>>;

    fn entry_mut(&mut self, key: &str) -> Option<EntryMut<'_>>;
}

const TRAIN_KEYS: &[&str] = &[
    "PROPOSAL_METHOD",
    "USE_FLIPPED",
    "FG_THRESH",
    "BG_THRESH_HI",
    "BG_THRESH_LO",
    "HAS_RPN",
    "BBOX_REG",
    "BBOX_NORMALIZE_TARGETS",
    "BBOX_NORMALIZE_TARGETS_PRECOMPUTED",
    "BBOX_NORMALIZE_MEANS",
    "BBOX_NORMALIZE_STDS",
];

impl Section for TrainConfig {
    fn keys(&self) -> &'static [&'static str] {
        TRAIN_KEYS
    }

    fn entry(&self, key: &str) -> Option<Entry<'_>> {
        let value = match key {
            "PROPOSAL_METHOD" => Value::Str(self.proposal_method.clone()),
            "USE_FLIPPED" => Value::Bool(self.use_flipped),
            "FG_THRESH" => Value::Float(self.fg_thresh),
            "BG_THRESH_HI" => Value::Float(self.bg_thresh_hi),
            "BG_THRESH_LO" => Value::Float(self.bg_thresh_lo),
            "HAS_RPN" => Value::Bool(self.has_rpn),
            "BBOX_REG" => Value::Bool(self.bbox_reg),
            "BBOX_NORMALIZE_TARGETS" => Value::Bool(self.bbox_normalize_targets),
            "BBOX_NORMALIZE_TARGETS_PRECOMPUTED" => {
                Value::Bool(self.bbox_normalize_targets_precomputed)
            }
            "BBOX_NORMALIZE_MEANS" => Value::Tuple(self.bbox_normalize_means.to_vec()),
            "BBOX_NORMALIZE_STDS" => Value::Tuple(self.bbox_normalize_stds.to_vec()),
            _ => return None,
        };
        Some(Entry::Leaf(value))
    }

    fn entry_mut(&mut self, key: &str) -> Option<EntryMut<'_>> {
        let slot = match key {
            "PROPOSAL_METHOD" => Slot::Str(&mut self.proposal_method),
            "USE_FLIPPED" => Slot::Bool(&mut self.use_flipped),
            "FG_THRESH" => Slot::Float(&mut self.fg_thresh),
            "BG_THRESH_HI" => Slot::Float(&mut self.bg_thresh_hi),
            "BG_THRESH_LO" => Slot::Float(&mut self.bg_thresh_lo),
            "HAS_RPN" => Slot::Bool(&mut self.has_rpn),
            "BBOX_REG" => Slot::Bool(&mut self.bbox_reg),
            "BBOX_NORMALIZE_TARGETS" => Slot::Bool(&mut self.bbox_normalize_targets),
            "BBOX_NORMALIZE_TARGETS_PRECOMPUTED" => {
                Slot::Bool(&mut self.bbox_normalize_targets_precomputed)
            }
            "BBOX_NORMALIZE_MEANS" => Slot::Tuple(&mut self.bbox_normalize_means),
            "BBOX_NORMALIZE_STDS" => Slot::Tuple(&mut self.bbox_normalize_stds),
            _ => return None,
        };
        Some(EntryMut::Leaf(slot))
    }
}

const ROOT_KEYS: &[&str] = &[
    "TRAIN",
    "ROOT_DIR",
    "DATA_DIR",
    "LOG_DIR",
    "CACHE_DIR",
    "SPLIT_DIR",
    "EXP_DIR",
    "LIMIT_RAM",
    "RNG_SEED",
];

fn path_value(path: &Path) -> Value {
    Value::Str(path.to_string_lossy().into_owned())
}

impl Section for Config {
    fn keys(&self) -> &'static [&'static str] {
        ROOT_KEYS
    }

    fn entry(&self, key: &str) -> Option<Entry<'_>> {
        let value = match key {
            "TRAIN" => return Some(Entry::Section(&self.train)),
            "ROOT_DIR" => path_value(&self.root_dir),
            "DATA_DIR" => path_value(&self.data_dir),
            "LOG_DIR" => path_value(&self.log_dir),
            "CACHE_DIR" => path_value(&self.cache_dir),
            "SPLIT_DIR" => path_value(&self.split_dir),
            "EXP_DIR" => Value::Str(self.exp_dir.clone()),
            "LIMIT_RAM" => Value::Bool(self.limit_ram),
            "RNG_SEED" => Value::Int(self.rng_seed),
            _ => return None,
        };
        Some(Entry::Leaf(value))
    }

    fn entry_mut(&mut self, key: &str) -> Option<EntryMut<'_>> {
        let slot = match key {
            "TRAIN" => return Some(EntryMut::Section(&mut self.train)),
            "ROOT_DIR" => Slot::Path(&mut self.root_dir),
            "DATA_DIR" => Slot::Path(&mut self.data_dir),
            "LOG_DIR" => Slot::Path(&mut self.log_dir),
            "CACHE_DIR" => Slot::Path(&mut self.cache_dir),
            "SPLIT_DIR" => Slot::Path(&mut self.split_dir),
            "EXP_DIR" => Slot::Str(&mut self.exp_dir),
            "LIMIT_RAM" => Slot::Bool(&mut self.limit_ram),
            "RNG_SEED" => Slot::Int(&mut self.rng_seed),
            _ => return None,
        };
        Some(EntryMut::Leaf(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_root() {
        let cfg = Config::with_root("/srv/densecap");
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/densecap/data"));
        assert_eq!(cfg.cache_dir, cfg.data_dir);
        assert_eq!(cfg.log_dir, PathBuf::from("/srv/densecap/logs"));
        assert_eq!(cfg.split_dir, PathBuf::from("/srv/densecap/info"));
        assert_eq!(cfg.exp_dir, "default");
        assert_eq!(cfg.rng_seed, 3);
        assert!(cfg.limit_ram);
    }

    #[test]
    fn test_lookup_leaf_and_subtree() {
        let cfg = Config::with_root("/srv/densecap");
        assert_eq!(cfg.get("TRAIN.FG_THRESH"), Some(Value::Float(0.5)));
        assert_eq!(cfg.get("TRAIN.PROPOSAL_METHOD"), Some(Value::Str("gt".into())));
        assert_eq!(cfg.get("RNG_SEED"), Some(Value::Int(3)));
        assert_eq!(cfg.lookup("TRAIN").map(|e| e.kind()).ok(), Some(ValueKind::Tree));
        assert!(cfg.get("TRAIN").is_none());
    }

    #[test]
    fn test_lookup_unknown_paths() {
        let cfg = Config::with_root("/srv/densecap");
        for path in ["TRAIN.NOPE", "NOPE", "RNG_SEED.x", "", "train.fg_thresh"] {
            let err = cfg.lookup(path).err().expect("unknown path");
            assert!(matches!(err, ConfigError::UnknownKey { .. }), "{path}: {err}");
        }
    }

    #[test]
    fn test_leaf_paths_cover_every_field() {
        let cfg = Config::default();
        let paths = cfg.leaf_paths();
        assert_eq!(paths.len(), TRAIN_KEYS.len() + ROOT_KEYS.len() - 1);
        assert_eq!(paths[0], "TRAIN.PROPOSAL_METHOD");
        assert!(paths.contains(&"TRAIN.BBOX_NORMALIZE_STDS".to_string()));
        assert!(paths.contains(&"RNG_SEED".to_string()));
        for path in &paths {
            assert!(cfg.get(path).is_some(), "{path}");
        }
    }

    #[test]
    fn test_slot_assign_rejects_mismatch() {
        let mut cfg = Config::default();
        let Some(EntryMut::Leaf(slot)) = cfg.train.entry_mut("FG_THRESH") else {
            panic!("FG_THRESH should be a leaf");
        };
        let err = slot.assign(Value::Str("high".into()), "TRAIN.FG_THRESH").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch (float vs. str) for config key: TRAIN.FG_THRESH"
        );
    }

    #[test]
    fn test_slot_assign_tuple_length_must_match() {
        let mut cfg = Config::default();
        let Some(EntryMut::Leaf(slot)) = cfg.train.entry_mut("BBOX_NORMALIZE_STDS") else {
            panic!("BBOX_NORMALIZE_STDS should be a leaf");
        };
        assert!(slot.assign(Value::Tuple(vec![1.0, 2.0]), "TRAIN.BBOX_NORMALIZE_STDS").is_err());
        assert_eq!(cfg.train.bbox_normalize_stds, [0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn test_serialize_uses_external_key_names() {
        let cfg = Config::with_root("/srv/densecap");
        let yaml = serde_yaml::to_string(&cfg).expect("yaml");
        assert!(yaml.contains("TRAIN:"));
        assert!(yaml.contains("BBOX_NORMALIZE_TARGETS_PRECOMPUTED: false"));
        assert!(yaml.contains("ROOT_DIR: /srv/densecap"));
        assert!(yaml.contains("RNG_SEED: 3"));
    }

    #[test]
    fn test_entry_to_yaml_subtree() {
        let cfg = Config::default();
        let train = cfg.lookup("TRAIN").expect("TRAIN").to_yaml();
        assert_eq!(train["FG_THRESH"], YamlValue::Number(0.5.into()));
        assert_eq!(train["USE_FLIPPED"], YamlValue::Bool(true));
    }
}
